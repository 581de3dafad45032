//! Free/busy engine
//!
//! Subtracts busy intervals from each day's working window and reports the
//! gaps long enough for the requested booking.

use calcopilot_domain::constants::MINUTES_PER_DAY;
use calcopilot_domain::{
    BusyInterval, CalendarEvent, CopilotError, EventTime, FreeSlot, FreeSlotQuery,
    FreeSlotReport, Result, WorkingHoursPolicy,
};
use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::timezone::{instant_at_local_hour, parse_timezone};

/// Free slots between `query.start_date` and `query.end_date` (inclusive).
///
/// Days with an all-day busy interval produce no slots. Invalid queries are
/// rejected before any work is done, so an `Ok` with no slots always means
/// the calendar is genuinely full.
pub fn compute_free_slots(
    busy: &[BusyInterval],
    query: &FreeSlotQuery,
    policy: &WorkingHoursPolicy,
) -> Result<FreeSlotReport> {
    let tz = validate_query(query, policy)?;

    let min_secs = required_gap(query)?;
    let mut slots = Vec::new();

    let mut day = query.start_date;
    while day <= query.end_date {
        if busy.iter().any(|interval| interval.blocks_date(day)) {
            debug!(%day, "day blocked by all-day event");
        } else {
            let work_start = instant_at_local_hour(day, policy.start_hour, tz)?;
            let work_end = instant_at_local_hour(day, policy.end_hour, tz)?;
            sweep_day(busy, work_start, work_end, min_secs, &mut slots);
        }

        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }

    let total_found = slots.len();
    slots.truncate(query.max_slots);
    Ok(FreeSlotReport { slots, total_found })
}

/// Reject queries the engine cannot answer, returning the parsed timezone.
pub fn validate_query(query: &FreeSlotQuery, policy: &WorkingHoursPolicy) -> Result<Tz> {
    let tz = parse_timezone(&policy.timezone)?;
    if query.duration_minutes <= 0 {
        return Err(CopilotError::InvalidInput(format!(
            "duration_minutes must be positive (got {})",
            query.duration_minutes
        )));
    }
    if query.duration_minutes > i64::from(MINUTES_PER_DAY) {
        return Err(CopilotError::InvalidInput(format!(
            "duration_minutes must be at most {MINUTES_PER_DAY} (got {})",
            query.duration_minutes
        )));
    }
    required_gap(query)?;
    if query.start_date > query.end_date {
        return Err(CopilotError::InvalidInput(format!(
            "start date {} is after end date {}",
            query.start_date, query.end_date
        )));
    }
    if policy.end_hour > 23 || policy.start_hour > 23 {
        return Err(CopilotError::InvalidInput(format!(
            "working hours must be between 0 and 23 (got {}..{})",
            policy.start_hour, policy.end_hour
        )));
    }
    if policy.start_hour >= policy.end_hour {
        return Err(CopilotError::InvalidInput(format!(
            "working hours start ({}) must be before end ({})",
            policy.start_hour, policy.end_hour
        )));
    }
    let span_days = (query.end_date - query.start_date).num_days() + 1;
    if span_days > query.max_range_days {
        return Err(CopilotError::InvalidInput(format!(
            "date range of {span_days} days exceeds the limit of {} days",
            query.max_range_days
        )));
    }
    Ok(tz)
}

fn required_gap(query: &FreeSlotQuery) -> Result<i64> {
    let max_secs = i64::from(MINUTES_PER_DAY) * 60;
    match query.required_gap_seconds() {
        Some(secs) if secs > 0 && secs <= max_secs => Ok(secs),
        _ => Err(CopilotError::InvalidInput(format!(
            "duration must be between 1 second and {MINUTES_PER_DAY} minutes (got {} minutes)",
            query.duration_minutes
        ))),
    }
}

fn sweep_day(
    busy: &[BusyInterval],
    work_start: DateTime<Utc>,
    work_end: DateTime<Utc>,
    min_secs: i64,
    slots: &mut Vec<FreeSlot>,
) {
    let mut clipped: Vec<(DateTime<Utc>, DateTime<Utc>)> = busy
        .iter()
        .filter_map(|interval| match *interval {
            BusyInterval::Timed { start, end } if start < work_end && end > work_start => {
                Some((start.max(work_start), end.min(work_end)))
            }
            _ => None,
        })
        .collect();
    clipped.sort_by_key(|(start, _)| *start);

    let mut free_from = work_start;
    for (start, end) in clipped {
        if start > free_from && (start - free_from).num_seconds() >= min_secs {
            slots.push(FreeSlot::new(free_from, start));
        }
        free_from = free_from.max(end);
    }

    if free_from < work_end && (work_end - free_from).num_seconds() >= min_secs {
        slots.push(FreeSlot::new(free_from, work_end));
    }
}

/// Busy intervals for a flat list of calendar events.
///
/// All-day events block every date from start up to (not including) their
/// end date. Timed events that end at or before they start are skipped.
pub fn busy_intervals_from_events(events: &[CalendarEvent]) -> Vec<BusyInterval> {
    let mut busy = Vec::with_capacity(events.len());
    for event in events {
        match (event.start, event.end) {
            (EventTime::Date(start), end) => {
                let last = match end {
                    EventTime::Date(end) if end > start => end.pred_opt().unwrap_or(start),
                    _ => start,
                };
                busy.extend(dates_between(start, last).map(BusyInterval::all_day));
            }
            (EventTime::DateTime(start), EventTime::DateTime(end)) => {
                if let Some(interval) =
                    BusyInterval::timed(start.with_timezone(&Utc), end.with_timezone(&Utc))
                {
                    busy.push(interval);
                }
            }
            (EventTime::DateTime(_), EventTime::Date(_)) => {
                debug!(event_id = %event.id, "skipping event with mixed start/end kinds");
            }
        }
    }
    busy
}

fn dates_between(first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    first.iter_days().take_while(move |day| *day <= last)
}
