//! Shared helpers for `calcopilot-api` route tests.
//!
//! In-memory ports wired into an [`AppContext`] so routes run without any
//! network access.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use calcopilot_api::{router, AppContext};
use calcopilot_common::MockClock;
use calcopilot_core::{
    AssistantTurn, CalendarConnector, CalendarPort, CompletionProvider, DraftMailbox,
    FlightSearchPort, TextStream, ToolDefinition, WeatherPort,
};
use calcopilot_domain::{
    AppConfig, CalendarEvent, ChatMessage, CopilotError, DailyWeather, DraftData, EventPatch,
    EventTime, EventWindow, FlightOffer, FlightQuery, GeoLocation, NewEvent,
    Result as DomainResult,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tower::ServiceExt;

pub const TOKEN: &str = "ya29.test-token";

/// Completion provider replaying scripted turns, then streaming `chunks`.
#[derive(Default, Clone)]
pub struct ScriptedProvider {
    turns: Arc<Mutex<VecDeque<AssistantTurn>>>,
    chunks: Vec<String>,
    fail: bool,
    streamed: Arc<Mutex<Option<Vec<ChatMessage>>>>,
}

impl ScriptedProvider {
    pub fn new(turns: Vec<AssistantTurn>, chunks: &[&str]) -> Self {
        Self {
            turns: Arc::new(Mutex::new(turns.into())),
            chunks: chunks.iter().map(|c| (*c).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn streamed_messages(&self) -> Option<Vec<ChatMessage>> {
        self.streamed.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> DomainResult<AssistantTurn> {
        if self.fail {
            return Err(CopilotError::Upstream("model unavailable".into()));
        }
        Ok(self.turns.lock().unwrap().pop_front().unwrap_or_else(|| AssistantTurn::text("Done.")))
    }

    async fn stream(&self, messages: &[ChatMessage]) -> DomainResult<TextStream> {
        *self.streamed.lock().unwrap() = Some(messages.to_vec());
        let chunks: Vec<DomainResult<String>> = self.chunks.iter().cloned().map(Ok).collect();
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}

/// Calendar shared by every token; remembers the tokens it was bound to.
#[derive(Default, Clone)]
pub struct MockCalendar {
    events: Arc<Mutex<Vec<CalendarEvent>>>,
    tokens: Arc<Mutex<Vec<String>>>,
    windows: Arc<Mutex<Vec<EventWindow>>>,
    fail_with: Option<CopilotError>,
}

impl MockCalendar {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self { events: Arc::new(Mutex::new(events)), ..Self::default() }
    }

    pub fn failing(error: CopilotError) -> Self {
        Self { fail_with: Some(error), ..Self::default() }
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    pub fn windows(&self) -> Vec<EventWindow> {
        self.windows.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<CalendarEvent> {
        self.events.lock().unwrap().clone()
    }

    fn check(&self) -> DomainResult<()> {
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl CalendarConnector for MockCalendar {
    fn connect(&self, access_token: &str) -> Arc<dyn CalendarPort> {
        self.tokens.lock().unwrap().push(access_token.to_string());
        Arc::new(self.clone())
    }
}

#[async_trait]
impl CalendarPort for MockCalendar {
    async fn list_events(
        &self,
        window: EventWindow,
        max_results: u32,
    ) -> DomainResult<Vec<CalendarEvent>> {
        self.windows.lock().unwrap().push(window);
        self.check()?;
        Ok(self.events.lock().unwrap().iter().take(max_results as usize).cloned().collect())
    }

    async fn create_event(&self, event: NewEvent) -> DomainResult<CalendarEvent> {
        self.check()?;
        let mut events = self.events.lock().unwrap();
        let created = CalendarEvent {
            id: format!("evt-{}", events.len() + 1),
            summary: Some(event.summary),
            description: event.description,
            location: event.location,
            start: event.start,
            end: event.end,
        };
        events.push(created.clone());
        Ok(created)
    }

    async fn update_event(&self, event_id: &str, patch: EventPatch) -> DomainResult<CalendarEvent> {
        self.check()?;
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| CopilotError::NotFound(format!("Event {event_id} not found")))?;
        if let Some(summary) = patch.summary {
            event.summary = Some(summary);
        }
        if let Some(start) = patch.start {
            event.start = start;
        }
        if let Some(end) = patch.end {
            event.end = end;
        }
        Ok(event.clone())
    }

    async fn delete_event(&self, event_id: &str) -> DomainResult<()> {
        self.check()?;
        self.events.lock().unwrap().retain(|e| e.id != event_id);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockMailbox {
    saved: Arc<Mutex<Vec<(String, DraftData)>>>,
}

impl MockMailbox {
    pub fn saved(&self) -> Vec<(String, DraftData)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl DraftMailbox for MockMailbox {
    async fn save_draft(&self, access_token: &str, draft: &DraftData) -> DomainResult<String> {
        self.saved.lock().unwrap().push((access_token.to_string(), draft.clone()));
        Ok("https://mail.google.com/mail/u/0/#drafts".into())
    }
}

/// Travel ports are not under test here.
pub struct NoTravel;

#[async_trait]
impl FlightSearchPort for NoTravel {
    async fn resolve_location(&self, query: &str) -> DomainResult<String> {
        Err(CopilotError::NotFound(format!("Could not find an airport for \"{query}\".")))
    }

    async fn search_offers(&self, _query: &FlightQuery) -> DomainResult<Vec<FlightOffer>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl WeatherPort for NoTravel {
    async fn geocode(&self, _city: &str) -> DomainResult<Option<GeoLocation>> {
        Ok(None)
    }

    async fn daily_forecast(
        &self,
        _location: &GeoLocation,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> DomainResult<Vec<DailyWeather>> {
        Ok(Vec::new())
    }
}

/// Fixed "now" for prompt assertions: Monday 2026-03-02 15:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 15, 0, 0).unwrap()
}

pub struct TestApp {
    pub ctx: Arc<AppContext>,
    pub calendar: MockCalendar,
    pub mailbox: MockMailbox,
}

impl TestApp {
    pub fn new(provider: Option<ScriptedProvider>, calendar: MockCalendar) -> Self {
        let mut config = AppConfig::default();
        config.free_busy.default_timezone = "America/New_York".into();
        Self::with_config(config, provider, calendar)
    }

    pub fn with_config(
        config: AppConfig,
        provider: Option<ScriptedProvider>,
        calendar: MockCalendar,
    ) -> Self {
        let mailbox = MockMailbox::default();
        let mut builder = AppContext::builder(config)
            .calendar(Arc::new(calendar.clone()))
            .mailbox(Arc::new(mailbox.clone()))
            .flights(Arc::new(NoTravel))
            .weather(Arc::new(NoTravel))
            .clock(Arc::new(MockClock::starting_at(now())));
        if let Some(provider) = provider {
            builder = builder.completion(Arc::new(provider));
        }
        Self { ctx: Arc::new(builder.build().unwrap()), calendar, mailbox }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        router(self.ctx.clone()).oneshot(request).await.unwrap()
    }
}

pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {TOKEN}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

pub fn timed_event(id: &str, summary: &str, start: &str, end: &str) -> CalendarEvent {
    CalendarEvent {
        id: id.into(),
        summary: Some(summary.into()),
        description: None,
        location: None,
        start: EventTime::DateTime(DateTime::parse_from_rfc3339(start).unwrap()),
        end: EventTime::DateTime(DateTime::parse_from_rfc3339(end).unwrap()),
    }
}

pub fn all_day_event(id: &str, summary: &str, start: NaiveDate, end: NaiveDate) -> CalendarEvent {
    CalendarEvent {
        id: id.into(),
        summary: Some(summary.into()),
        description: None,
        location: None,
        start: EventTime::Date(start),
        end: EventTime::Date(end),
    }
}
