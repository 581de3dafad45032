//! Day-grid layout types

use serde::{Deserialize, Serialize};

use crate::constants::{MINUTES_PER_DAY, MIN_EVENT_SPAN_MINUTES};

/// A timed event positioned within one local day, in minutes since midnight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub id: String,
    pub summary: String,
    pub start_minute: u32,
    pub end_minute: u32,
}

impl TimedEvent {
    /// Builds a normalized event.
    ///
    /// An end at or before the start (midnight-crossing or zero-length data)
    /// becomes `min(start + 30, 1440)`; minutes past the end of the day are
    /// capped at 1440.
    pub fn new(
        id: impl Into<String>,
        summary: impl Into<String>,
        start_minute: u32,
        end_minute: u32,
    ) -> Self {
        let start_minute = start_minute.min(MINUTES_PER_DAY - 1);
        let end_minute = if end_minute <= start_minute {
            (start_minute + MIN_EVENT_SPAN_MINUTES).min(MINUTES_PER_DAY)
        } else {
            end_minute.min(MINUTES_PER_DAY)
        };
        Self { id: id.into(), summary: summary.into(), start_minute, end_minute }
    }

    /// Half-open overlap test on `[start, end)`.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_minute < other.end_minute && other.start_minute < self.end_minute
    }
}

/// A [`TimedEvent`] with its render column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSlot {
    #[serde(flatten)]
    pub event: TimedEvent,
    pub column: usize,
    pub total_columns: usize,
}
