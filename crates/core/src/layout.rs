//! Overlap layout for the day grid
//!
//! Overlapping events are split into side-by-side columns. Events are grouped
//! into clusters of transitively overlapping events; inside a cluster each
//! event takes the leftmost column that is free when it starts.

use calcopilot_domain::constants::UNTITLED_EVENT;
use calcopilot_domain::{CalendarEvent, EventTime, LayoutSlot, TimedEvent};
use chrono::{NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

use crate::timezone::to_local;

/// Assign a column and a column count to every event of one day.
///
/// Output is ordered by start minute; events with identical starts keep their
/// input order.
pub fn layout_day(mut events: Vec<TimedEvent>) -> Vec<LayoutSlot> {
    events.sort_by_key(|event| event.start_minute);

    let mut slots = Vec::with_capacity(events.len());
    let mut cluster: Vec<TimedEvent> = Vec::new();
    let mut cluster_end = 0;

    for event in events {
        if !cluster.is_empty() && event.start_minute >= cluster_end {
            place_cluster(std::mem::take(&mut cluster), &mut slots);
        }
        cluster_end = if cluster.is_empty() {
            event.end_minute
        } else {
            cluster_end.max(event.end_minute)
        };
        cluster.push(event);
    }
    if !cluster.is_empty() {
        place_cluster(cluster, &mut slots);
    }

    slots
}

fn place_cluster(cluster: Vec<TimedEvent>, slots: &mut Vec<LayoutSlot>) {
    // End minute of the last event placed in each column.
    let mut column_ends: Vec<u32> = Vec::new();
    let mut placed = Vec::with_capacity(cluster.len());

    for event in cluster {
        let column = match column_ends.iter().position(|end| *end <= event.start_minute) {
            Some(column) => {
                column_ends[column] = event.end_minute;
                column
            }
            None => {
                column_ends.push(event.end_minute);
                column_ends.len() - 1
            }
        };
        placed.push((event, column));
    }

    let total_columns = column_ends.len();
    slots.extend(
        placed.into_iter().map(|(event, column)| LayoutSlot { event, column, total_columns }),
    );
}

/// Timed events whose local start falls on `date`, in minutes of that day.
pub fn timed_events_for_day(events: &[CalendarEvent], date: NaiveDate, tz: Tz) -> Vec<TimedEvent> {
    events
        .iter()
        .filter_map(|event| {
            let (EventTime::DateTime(start), EventTime::DateTime(end)) = (event.start, event.end)
            else {
                return None;
            };
            let start = to_local(start.with_timezone(&Utc), tz);
            if start.date_naive() != date {
                return None;
            }
            let end = to_local(end.with_timezone(&Utc), tz);
            Some(TimedEvent::new(
                event.id.clone(),
                event.summary.clone().unwrap_or_else(|| UNTITLED_EVENT.to_string()),
                minute_of_day(start.hour(), start.minute()),
                minute_of_day(end.hour(), end.minute()),
            ))
        })
        .collect()
}

fn minute_of_day(hour: u32, minute: u32) -> u32 {
    hour * 60 + minute
}
