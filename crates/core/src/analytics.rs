//! Weekly meeting load
//!
//! Buckets timed events into the seven local days starting at `week_start`
//! and totals the minutes spent in them. All-day events are ignored.

use calcopilot_domain::constants::WORK_MINUTES_PER_WEEK;
use calcopilot_domain::{CalendarEvent, DayStats, EventTime, WeekStats};
use chrono::{Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

use crate::timezone::to_local;

const DAYS_PER_WEEK: usize = 7;

/// Meeting statistics for the week beginning on `week_start`.
///
/// An event counts toward the local day it starts on; events starting outside
/// the week are skipped. Durations round to the nearest minute and never go
/// below zero.
pub fn week_stats(events: &[CalendarEvent], week_start: NaiveDate, tz: Tz) -> WeekStats {
    let mut days: Vec<DayStats> = week_start
        .iter_days()
        .take(DAYS_PER_WEEK)
        .map(|date| DayStats {
            date,
            label: date.weekday().to_string(),
            is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            meeting_minutes: 0,
            event_count: 0,
        })
        .collect();

    for event in events {
        let EventTime::DateTime(start) = event.start else {
            continue;
        };
        let end = match event.end {
            EventTime::DateTime(end) => end,
            EventTime::Date(_) => start,
        };
        let local_date = to_local(start.with_timezone(&Utc), tz).date_naive();
        let Some(day) = days.iter_mut().find(|day| day.date == local_date) else {
            continue;
        };
        day.meeting_minutes += rounded_minutes((end - start).num_seconds());
        day.event_count += 1;
    }

    let total_events: usize = days.iter().map(|day| day.event_count).sum();
    let total_meeting_minutes: i64 = days.iter().map(|day| day.meeting_minutes).sum();
    let avg_meeting_minutes = match i64::try_from(total_events) {
        Ok(count) if count > 0 => (2 * total_meeting_minutes + count) / (2 * count),
        _ => 0,
    };
    let work_hours_percent =
        ((total_meeting_minutes * 100 + WORK_MINUTES_PER_WEEK / 2) / WORK_MINUTES_PER_WEEK).min(100);

    // Ties go to the earlier day.
    let busiest_day = days
        .iter()
        .fold(None::<&DayStats>, |best, day| match best {
            Some(best) if best.meeting_minutes >= day.meeting_minutes => Some(best),
            _ => Some(day),
        })
        .filter(|day| day.meeting_minutes > 0)
        .map(|day| day.label.clone());

    WeekStats {
        week_start,
        week_label: week_start.format("%B %Y").to_string(),
        total_events,
        total_meeting_minutes,
        avg_meeting_minutes,
        busiest_day,
        work_hours_percent,
        days,
    }
}

/// Whole minutes, half up, floored at zero.
fn rounded_minutes(secs: i64) -> i64 {
    (secs.max(0) + 30) / 60
}
