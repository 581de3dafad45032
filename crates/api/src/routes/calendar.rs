//! `/api/calendar` CRUD, the day-grid layout and weekly analytics

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use calcopilot_core::timezone::{local_day_window, parse_local_date};
use calcopilot_core::{layout_day, timed_events_for_day, week_stats};
use calcopilot_domain::{CalendarEvent, EventPatch, LayoutSlot, NewEvent, WeekStats};
use chrono::Days;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::auth::BearerToken;
use super::error::ApiError;
use crate::context::AppContext;

/// Page size for route listings.
const LIST_LIMIT: u32 = 250;

const MISSING_RANGE: &str = "Missing required query params: start, end (YYYY-MM-DD)";

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    start: Option<String>,
    end: Option<String>,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LayoutQuery {
    date: Option<String>,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    week_start: Option<String>,
    timezone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub event: CalendarEvent,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct DayLayoutResponse {
    pub date: String,
    pub timezone: String,
    pub all_day: Vec<CalendarEvent>,
    pub timed: Vec<LayoutSlot>,
}

pub async fn list_events(
    State(ctx): State<Arc<AppContext>>,
    BearerToken(token): BearerToken,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<EventsResponse>, ApiError> {
    let Query(query) = query?;
    let (Some(start), Some(end)) = (query.start, query.end) else {
        return Err(ApiError::bad_request(MISSING_RANGE));
    };
    let tz = ctx.resolve_timezone(query.timezone.as_deref());
    let window = local_day_window(parse_local_date(&start)?, parse_local_date(&end)?, tz)?;

    let events = ctx.calendar.connect(&token).list_events(window, LIST_LIMIT).await?;
    Ok(Json(EventsResponse { events }))
}

pub async fn create_event(
    State(ctx): State<Arc<AppContext>>,
    BearerToken(token): BearerToken,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<Json<EventResponse>, ApiError> {
    let Json(event) = payload?;
    let event = ctx.calendar.connect(&token).create_event(event).await?;
    info!(event_id = %event.id, "calendar event created");
    Ok(Json(EventResponse { event }))
}

pub async fn update_event(
    State(ctx): State<Arc<AppContext>>,
    BearerToken(token): BearerToken,
    Path(event_id): Path<String>,
    payload: Result<Json<EventPatch>, JsonRejection>,
) -> Result<Json<EventResponse>, ApiError> {
    let Json(patch) = payload?;
    if patch.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }
    let event = ctx.calendar.connect(&token).update_event(&event_id, patch).await?;
    info!(event_id = %event.id, "calendar event updated");
    Ok(Json(EventResponse { event }))
}

pub async fn delete_event(
    State(ctx): State<Arc<AppContext>>,
    BearerToken(token): BearerToken,
    Path(event_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    ctx.calendar.connect(&token).delete_event(&event_id).await?;
    info!(event_id = %event_id, "calendar event deleted");
    Ok(Json(SuccessResponse { success: true }))
}

/// All-day events plus column placement for the timed ones.
pub async fn day_layout(
    State(ctx): State<Arc<AppContext>>,
    BearerToken(token): BearerToken,
    query: Result<Query<LayoutQuery>, QueryRejection>,
) -> Result<Json<DayLayoutResponse>, ApiError> {
    let Query(query) = query?;
    let Some(raw_date) = query.date else {
        return Err(ApiError::bad_request("Missing required query param: date (YYYY-MM-DD)"));
    };
    let date = parse_local_date(&raw_date)?;
    let tz = ctx.resolve_timezone(query.timezone.as_deref());
    let window = local_day_window(date, date, tz)?;

    let events = ctx.calendar.connect(&token).list_events(window, LIST_LIMIT).await?;
    let timed = layout_day(timed_events_for_day(&events, date, tz));
    let all_day = events.into_iter().filter(CalendarEvent::is_all_day).collect();

    Ok(Json(DayLayoutResponse {
        date: date.to_string(),
        timezone: tz.name().to_string(),
        all_day,
        timed,
    }))
}

/// Meeting load for the seven days starting at `week_start`.
pub async fn week_analytics(
    State(ctx): State<Arc<AppContext>>,
    BearerToken(token): BearerToken,
    query: Result<Query<AnalyticsQuery>, QueryRejection>,
) -> Result<Json<WeekStats>, ApiError> {
    let Query(query) = query?;
    let Some(raw_start) = query.week_start else {
        return Err(ApiError::bad_request("Missing required query param: week_start (YYYY-MM-DD)"));
    };
    let week_start = parse_local_date(&raw_start)?;
    let week_end = week_start
        .checked_add_days(Days::new(6))
        .ok_or_else(|| ApiError::bad_request(format!("week_start {week_start} is out of range")))?;
    let tz = ctx.resolve_timezone(query.timezone.as_deref());
    let window = local_day_window(week_start, week_end, tz)?;

    let events = ctx.calendar.connect(&token).list_events(window, LIST_LIMIT).await?;
    Ok(Json(week_stats(&events, week_start, tz)))
}
