//! Weekly meeting statistics

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Timed-event load for one local day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Mon`.
    pub label: String,
    pub is_weekend: bool,
    pub meeting_minutes: i64,
    pub event_count: usize,
}

/// Seven consecutive [`DayStats`] plus week-level totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekStats {
    pub week_start: NaiveDate,
    /// Month and year of the first day, e.g. `March 2026`.
    pub week_label: String,
    pub total_events: usize,
    pub total_meeting_minutes: i64,
    pub avg_meeting_minutes: i64,
    /// `None` when no day has any meeting time.
    pub busiest_day: Option<String>,
    /// Share of a 40-hour week spent in meetings, capped at 100.
    pub work_hours_percent: i64,
    pub days: Vec<DayStats>,
}
