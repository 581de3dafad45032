//! Calendar tools: listing, availability and event mutations

use std::sync::Arc;

use async_trait::async_trait;
use calcopilot_domain::constants::UNTITLED_EVENT;
use calcopilot_domain::{
    CalendarEvent, CopilotError, EventPatch, EventTime, FreeBusyConfig, FreeSlotQuery, NewEvent,
    Result, WorkingHoursPolicy,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{non_empty, parse_args, to_json, ToolHandler, ToolName};
use crate::calendar_ports::CalendarPort;
use crate::free_busy::{busy_intervals_from_events, compute_free_slots, validate_query};
use crate::timezone::{
    format_with_offset, local_day_window, normalize_local_datetime, parse_local_date,
    parse_timezone,
};

const LIST_LIMIT: u32 = 50;
const FREE_BUSY_LIST_LIMIT: u32 = 250;

#[derive(Deserialize)]
struct DateRangeArgs {
    start_date: String,
    end_date: String,
}

#[derive(Serialize)]
struct EventListing<'a> {
    event_id: &'a str,
    summary: &'a str,
    start: String,
    end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

impl<'a> From<&'a CalendarEvent> for EventListing<'a> {
    fn from(event: &'a CalendarEvent) -> Self {
        Self {
            event_id: &event.id,
            summary: event.display_summary(),
            start: event.start.to_wire_string(),
            end: event.end.to_wire_string(),
            location: event.location.as_deref(),
            description: event.description.as_deref(),
        }
    }
}

fn mutation_result(event: &CalendarEvent) -> Value {
    json!({
        "success": true,
        "event_id": event.id,
        "summary": event.summary.as_deref().unwrap_or(UNTITLED_EVENT),
        "start": event.start.to_wire_string(),
        "end": event.end.to_wire_string(),
    })
}

/// `get_events`: events of the requested local days
pub struct GetEventsTool {
    calendar: Arc<dyn CalendarPort>,
    timezone: Tz,
}

impl GetEventsTool {
    pub fn new(calendar: Arc<dyn CalendarPort>, timezone: Tz) -> Self {
        Self { calendar, timezone }
    }
}

#[async_trait]
impl ToolHandler for GetEventsTool {
    async fn call(&self, args: Value) -> Result<Value> {
        let args: DateRangeArgs = parse_args(ToolName::GetEvents, args)?;
        let start = parse_local_date(&args.start_date)?;
        let end = parse_local_date(&args.end_date)?;
        let window = local_day_window(start, end, self.timezone)?;

        let events = self.calendar.list_events(window, LIST_LIMIT).await?;
        let listings: Vec<EventListing<'_>> = events.iter().map(EventListing::from).collect();
        to_json(&listings)
    }
}

#[derive(Deserialize)]
struct CreateArgs {
    summary: String,
    start_datetime: String,
    end_datetime: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

/// `create_calendar_event`
pub struct CreateEventTool {
    calendar: Arc<dyn CalendarPort>,
    timezone: Tz,
}

impl CreateEventTool {
    pub fn new(calendar: Arc<dyn CalendarPort>, timezone: Tz) -> Self {
        Self { calendar, timezone }
    }
}

#[async_trait]
impl ToolHandler for CreateEventTool {
    async fn call(&self, args: Value) -> Result<Value> {
        let args: CreateArgs = parse_args(ToolName::CreateCalendarEvent, args)?;
        let start = normalize_local_datetime(&args.start_datetime, self.timezone)?;
        let end = normalize_local_datetime(&args.end_datetime, self.timezone)?;
        if end <= start {
            return Err(CopilotError::InvalidInput(
                "end_datetime must be after start_datetime".into(),
            ));
        }

        let event = self
            .calendar
            .create_event(NewEvent {
                summary: args.summary,
                start: EventTime::DateTime(start),
                end: EventTime::DateTime(end),
                description: non_empty(args.description),
                location: non_empty(args.location),
            })
            .await?;
        debug!(event_id = %event.id, "calendar event created");
        Ok(mutation_result(&event))
    }
}

#[derive(Deserialize)]
struct UpdateArgs {
    event_id: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    start_datetime: Option<String>,
    #[serde(default)]
    end_datetime: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

/// `update_calendar_event`: patches only the provided fields
pub struct UpdateEventTool {
    calendar: Arc<dyn CalendarPort>,
    timezone: Tz,
}

impl UpdateEventTool {
    pub fn new(calendar: Arc<dyn CalendarPort>, timezone: Tz) -> Self {
        Self { calendar, timezone }
    }

    fn normalize(&self, raw: Option<String>) -> Result<Option<EventTime>> {
        raw.map(|raw| normalize_local_datetime(&raw, self.timezone).map(EventTime::DateTime))
            .transpose()
    }
}

#[async_trait]
impl ToolHandler for UpdateEventTool {
    async fn call(&self, args: Value) -> Result<Value> {
        let args: UpdateArgs = parse_args(ToolName::UpdateCalendarEvent, args)?;
        let patch = EventPatch {
            summary: args.summary,
            start: self.normalize(args.start_datetime)?,
            end: self.normalize(args.end_datetime)?,
            description: args.description,
            location: args.location,
        };
        if patch.is_empty() {
            return Err(CopilotError::InvalidInput(
                "No fields to update were provided.".into(),
            ));
        }

        let event = self.calendar.update_event(&args.event_id, patch).await?;
        debug!(event_id = %event.id, "calendar event updated");
        Ok(mutation_result(&event))
    }
}

#[derive(Deserialize)]
struct DeleteArgs {
    event_id: String,
}

/// `delete_calendar_event`
pub struct DeleteEventTool {
    calendar: Arc<dyn CalendarPort>,
}

impl DeleteEventTool {
    pub fn new(calendar: Arc<dyn CalendarPort>) -> Self {
        Self { calendar }
    }
}

#[async_trait]
impl ToolHandler for DeleteEventTool {
    async fn call(&self, args: Value) -> Result<Value> {
        let args: DeleteArgs = parse_args(ToolName::DeleteCalendarEvent, args)?;
        self.calendar.delete_event(&args.event_id).await?;
        debug!(event_id = %args.event_id, "calendar event deleted");
        Ok(json!({ "success": true }))
    }
}

#[derive(Deserialize)]
struct FreeSlotArgs {
    start_date: String,
    end_date: String,
    #[serde(default)]
    duration_minutes: Option<f64>,
    #[serde(default)]
    timezone: Option<String>,
}

#[derive(Serialize)]
struct SlotView {
    start: String,
    end: String,
    available_minutes: i64,
}

fn minutes_value(minutes: f64) -> Value {
    if minutes.fract() == 0.0 {
        json!(minutes as i64)
    } else {
        json!(minutes)
    }
}

/// `get_free_slots`: the free/busy engine over the user's calendar
pub struct FreeSlotsTool {
    calendar: Arc<dyn CalendarPort>,
    timezone: Tz,
    config: FreeBusyConfig,
}

impl FreeSlotsTool {
    pub fn new(calendar: Arc<dyn CalendarPort>, timezone: Tz, config: FreeBusyConfig) -> Self {
        Self { calendar, timezone, config }
    }
}

#[async_trait]
impl ToolHandler for FreeSlotsTool {
    async fn call(&self, args: Value) -> Result<Value> {
        let args: FreeSlotArgs = parse_args(ToolName::GetFreeSlots, args)?;
        let tz = match non_empty(args.timezone) {
            Some(name) => parse_timezone(&name)?,
            None => self.timezone,
        };
        let requested = match args.duration_minutes {
            Some(minutes) if minutes.is_finite() => minutes,
            Some(_) => 0.0,
            None => self.config.default_duration_minutes as f64,
        };

        let start = parse_local_date(&args.start_date)?;
        let end = parse_local_date(&args.end_date)?;
        // Float-to-int casts saturate; out-of-range values fail validation.
        let query = FreeSlotQuery::new(start, end, requested.ceil() as i64)
            .with_min_gap_seconds((requested * 60.0).ceil() as i64)
            .with_max_slots(self.config.max_slots)
            .with_max_range_days(self.config.max_range_days);
        let policy =
            WorkingHoursPolicy::new(self.config.work_start_hour, self.config.work_end_hour, tz.name());
        validate_query(&query, &policy)?;

        let window = local_day_window(start, end, tz)?;
        let events = self.calendar.list_events(window, FREE_BUSY_LIST_LIMIT).await?;
        let busy = busy_intervals_from_events(&events);
        let report = compute_free_slots(&busy, &query, &policy)?;
        debug!(
            timezone = tz.name(),
            events = events.len(),
            total_found = report.total_found,
            "computed free slots"
        );

        let slots: Vec<SlotView> = report
            .slots
            .iter()
            .map(|slot| SlotView {
                start: format_with_offset(slot.start, tz),
                end: format_with_offset(slot.end, tz),
                available_minutes: slot.available_minutes,
            })
            .collect();

        let mut result = json!({
            "duration_requested_minutes": minutes_value(requested),
            "search_window": { "start": start.to_string(), "end": end.to_string() },
            "total_free_slots_found": report.total_found,
            "slots_returned": slots.len(),
            "slots": slots,
        });
        if report.is_truncated() {
            result["note"] = json!(format!(
                "Only the first {} of {} slots are shown.",
                report.slots.len(),
                report.total_found
            ));
        }
        Ok(result)
    }
}
