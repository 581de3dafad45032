//! Shared test helpers for `calcopilot-core` integration tests.
//!
//! In-memory port implementations so tests can focus on behaviour instead of
//! wiring. Not every test binary uses every helper.

#![allow(dead_code)]

pub mod calendar;
pub mod provider;
pub mod travel;

use calcopilot_domain::{CalendarEvent, EventTime};
use chrono::{DateTime, FixedOffset, NaiveDate};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}

pub fn timed_event(id: &str, summary: &str, start: &str, end: &str) -> CalendarEvent {
    CalendarEvent {
        id: id.into(),
        summary: Some(summary.into()),
        description: None,
        location: None,
        start: EventTime::DateTime(at(start)),
        end: EventTime::DateTime(at(end)),
    }
}

pub fn all_day_event(id: &str, start: NaiveDate, end: NaiveDate) -> CalendarEvent {
    CalendarEvent {
        id: id.into(),
        summary: Some("All day".into()),
        description: None,
        location: None,
        start: EventTime::Date(start),
        end: EventTime::Date(end),
    }
}
