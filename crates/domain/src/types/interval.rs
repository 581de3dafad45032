//! Busy/free interval model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_FREE_SLOTS, DEFAULT_MAX_RANGE_DAYS};

/// A range during which nothing new may be scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BusyInterval {
    /// Blocks the whole local day, whatever the working hours are.
    AllDay { date: NaiveDate },
    /// Absolute range; `start < end` for anything built via [`BusyInterval::timed`].
    Timed { start: DateTime<Utc>, end: DateTime<Utc> },
}

impl BusyInterval {
    pub fn all_day(date: NaiveDate) -> Self {
        Self::AllDay { date }
    }

    /// Returns `None` for empty or inverted ranges.
    pub fn timed(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self::Timed { start, end })
    }

    pub fn blocks_date(&self, day: NaiveDate) -> bool {
        matches!(self, Self::AllDay { date } if *date == day)
    }
}

/// A contiguous gap inside the working window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// `round((end - start) / 60s)`
    pub available_minutes: i64,
}

impl FreeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let secs = (end - start).num_seconds();
        // Round half up without going through floats.
        let available_minutes = (secs + 30).div_euclid(60);
        Self { start, end, available_minutes }
    }
}

/// Daily scheduling window in a named timezone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHoursPolicy {
    pub start_hour: u32,
    pub end_hour: u32,
    /// IANA name, e.g. `America/New_York`.
    pub timezone: String,
}

impl WorkingHoursPolicy {
    pub fn new(start_hour: u32, end_hour: u32, timezone: impl Into<String>) -> Self {
        Self { start_hour, end_hour, timezone: timezone.into() }
    }
}

/// What an availability lookup asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeSlotQuery {
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    pub duration_minutes: i64,
    /// Overrides `duration_minutes * 60` when the request has a fractional minute.
    pub min_gap_seconds: Option<i64>,
    pub max_slots: usize,
    /// Longest accepted `start_date..=end_date` span, in days.
    pub max_range_days: i64,
}

impl FreeSlotQuery {
    /// Query with the default slot cap and range limit.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, duration_minutes: i64) -> Self {
        Self {
            start_date,
            end_date,
            duration_minutes,
            min_gap_seconds: None,
            max_slots: DEFAULT_MAX_FREE_SLOTS,
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
        }
    }

    #[must_use]
    pub fn with_max_slots(mut self, max_slots: usize) -> Self {
        self.max_slots = max_slots;
        self
    }

    #[must_use]
    pub fn with_min_gap_seconds(mut self, seconds: i64) -> Self {
        self.min_gap_seconds = Some(seconds);
        self
    }

    /// Shortest gap that counts as free, or `None` if it does not fit in an `i64`.
    pub fn required_gap_seconds(&self) -> Option<i64> {
        self.min_gap_seconds.or_else(|| self.duration_minutes.checked_mul(60))
    }

    #[must_use]
    pub fn with_max_range_days(mut self, max_range_days: i64) -> Self {
        self.max_range_days = max_range_days;
        self
    }
}

/// Engine output: the capped slot list plus the uncapped count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlotReport {
    pub slots: Vec<FreeSlot>,
    pub total_found: usize,
}

impl FreeSlotReport {
    pub fn is_truncated(&self) -> bool {
        self.total_found > self.slots.len()
    }
}
