//! Google API payloads

use calcopilot_domain::{CalendarEvent, EventTime};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleErrorBody {
    pub error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleEventsResponse {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleEvent {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start: Option<GoogleEventTime>,
    #[serde(default)]
    pub end: Option<GoogleEventTime>,
}

/// `start`/`end` as Google sends them; may carry `timeZone` next to the value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoogleEventTime {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub date_time: Option<DateTime<FixedOffset>>,
}

impl GoogleEventTime {
    fn into_event_time(self) -> Option<EventTime> {
        match (self.date_time, self.date) {
            (Some(dt), _) => Some(EventTime::DateTime(dt)),
            (None, Some(date)) => Some(EventTime::Date(date)),
            (None, None) => None,
        }
    }
}

impl GoogleEvent {
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelled")
    }

    /// `None` when either bound is missing.
    pub fn into_domain(self) -> Option<CalendarEvent> {
        let start = self.start?.into_event_time()?;
        let end = self.end?.into_event_time()?;
        Some(CalendarEvent {
            id: self.id,
            summary: self.summary,
            description: self.description,
            location: self.location,
            start,
            end,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DraftRequest<'a> {
    pub message: RawMessage<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RawMessage<'a> {
    pub raw: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DraftResponse {
    #[serde(default)]
    pub id: Option<String>,
}
