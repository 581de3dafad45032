//! Google Calendar v3 adapter for the user's primary calendar

use std::sync::Arc;

use async_trait::async_trait;
use calcopilot_core::{CalendarConnector, CalendarPort};
use calcopilot_domain::{CalendarEvent, CopilotError, EventPatch, EventWindow, NewEvent, Result};
use chrono::SecondsFormat;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::types::{GoogleEvent, GoogleEventsResponse};
use super::{google_error, join_segments, read_json};
use crate::http::HttpClient;

const PRIMARY_CALENDAR: &str = "primary";

/// Calendar client bound to one access token
#[derive(Clone)]
pub struct GoogleCalendarClient {
    http: HttpClient,
    base_url: String,
    access_token: String,
}

impl GoogleCalendarClient {
    pub fn new(http: HttpClient, base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into(), access_token: access_token.into() }
    }

    fn events_url(&self, event_id: Option<&str>) -> Result<Url> {
        let mut segments = vec!["calendars", PRIMARY_CALENDAR, "events"];
        segments.extend(event_id);
        join_segments(&self.base_url, &segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url).bearer_auth(&self.access_token)
    }

    async fn execute(&self, builder: RequestBuilder, fallback: &str) -> Result<Response> {
        let response = self.http.send(builder).await?;
        if !response.status().is_success() {
            return Err(google_error(response, fallback).await);
        }
        Ok(response)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> Result<T> {
        read_json(self.execute(builder, fallback).await?).await
    }
}

fn into_event(event: GoogleEvent) -> Result<CalendarEvent> {
    let id = event.id.clone();
    event
        .into_domain()
        .ok_or_else(|| CopilotError::Upstream(format!("Calendar returned event {id} without start or end")))
}

#[async_trait]
impl CalendarPort for GoogleCalendarClient {
    async fn list_events(&self, window: EventWindow, max_results: u32) -> Result<Vec<CalendarEvent>> {
        let time_min = window.time_min.to_rfc3339_opts(SecondsFormat::Secs, true);
        let time_max = window.time_max.to_rfc3339_opts(SecondsFormat::Secs, true);
        debug!(%time_min, %time_max, max_results, "listing calendar events");

        let builder = self.request(Method::GET, self.events_url(None)?).query(&[
            ("timeMin", time_min),
            ("timeMax", time_max),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
            ("maxResults", max_results.to_string()),
        ]);
        let response: GoogleEventsResponse =
            self.execute_json(builder, "Failed to list calendar events").await?;

        let events: Vec<CalendarEvent> = response
            .items
            .into_iter()
            .filter(|event| !event.is_cancelled())
            .filter_map(|event| {
                let id = event.id.clone();
                let converted = event.into_domain();
                if converted.is_none() {
                    warn!(event_id = %id, "skipping calendar event without start or end");
                }
                converted
            })
            .collect();

        debug!(count = events.len(), "calendar events listed");
        Ok(events)
    }

    async fn create_event(&self, event: NewEvent) -> Result<CalendarEvent> {
        debug!(summary = %event.summary, "creating calendar event");
        let builder = self.request(Method::POST, self.events_url(None)?).json(&event);
        let created: GoogleEvent = self.execute_json(builder, "Failed to create calendar event").await?;
        into_event(created)
    }

    async fn update_event(&self, event_id: &str, patch: EventPatch) -> Result<CalendarEvent> {
        debug!(event_id, "patching calendar event");
        let builder = self.request(Method::PATCH, self.events_url(Some(event_id))?).json(&patch);
        let updated: GoogleEvent = self.execute_json(builder, "Failed to update calendar event").await?;
        into_event(updated)
    }

    async fn delete_event(&self, event_id: &str) -> Result<()> {
        debug!(event_id, "deleting calendar event");
        let builder = self.request(Method::DELETE, self.events_url(Some(event_id))?);
        self.execute(builder, "Failed to delete calendar event").await?;
        Ok(())
    }
}

/// Hands out [`GoogleCalendarClient`]s sharing one HTTP client
#[derive(Clone)]
pub struct GoogleCalendarConnector {
    http: HttpClient,
    base_url: String,
}

impl GoogleCalendarConnector {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }
}

impl CalendarConnector for GoogleCalendarConnector {
    fn connect(&self, access_token: &str) -> Arc<dyn CalendarPort> {
        Arc::new(GoogleCalendarClient::new(self.http.clone(), self.base_url.clone(), access_token))
    }
}
