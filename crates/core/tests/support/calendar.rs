use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Barrier;
use calcopilot_core::CalendarPort;
use calcopilot_domain::{
    CalendarEvent, CopilotError, EventPatch, EventTime, EventWindow, NewEvent,
    Result as DomainResult,
};

/// Calls seen by [`MockCalendar`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarCall {
    List { max_results: u32 },
    Create(String),
    Update(String),
    Delete(String),
}

/// In-memory calendar.
///
/// Lists return every stored event overlapping the window. Writes assign
/// sequential ids and are visible to later reads. Set `fail_with` to make
/// every call return that error. With a barrier, each list waits on it
/// before answering.
#[derive(Default, Clone)]
pub struct MockCalendar {
    events: Arc<Mutex<Vec<CalendarEvent>>>,
    calls: Arc<Mutex<Vec<CalendarCall>>>,
    windows: Arc<Mutex<Vec<EventWindow>>>,
    fail_with: Option<CopilotError>,
    list_barrier: Option<Arc<Barrier>>,
}

impl MockCalendar {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self { events: Arc::new(Mutex::new(events)), ..Self::default() }
    }

    pub fn failing(error: CopilotError) -> Self {
        Self { fail_with: Some(error), ..Self::default() }
    }

    pub fn with_list_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.list_barrier = Some(barrier);
        self
    }

    pub fn calls(&self) -> Vec<CalendarCall> {
        self.calls.lock().unwrap().clone()
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

fn overlaps(event: &CalendarEvent, window: &EventWindow) -> bool {
    match (event.start, event.end) {
        (EventTime::DateTime(start), EventTime::DateTime(end)) => {
            start < window.time_max && end > window.time_min
        }
        (EventTime::Date(date), _) => {
            date >= window.time_min.date_naive() && date <= window.time_max.date_naive()
        }
        _ => false,
    }
}

#[async_trait]
impl CalendarPort for MockCalendar {
    async fn list_events(
        &self,
        window: EventWindow,
        max_results: u32,
    ) -> DomainResult<Vec<CalendarEvent>> {
        self.calls.lock().unwrap().push(CalendarCall::List { max_results });
        self.windows.lock().unwrap().push(window);
        if let Some(barrier) = &self.list_barrier {
            barrier.wait().await;
        }
        self.check()?;
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| overlaps(event, &window))
            .take(max_results as usize)
            .cloned()
            .collect())
    }

    async fn create_event(&self, event: NewEvent) -> DomainResult<CalendarEvent> {
        self.calls.lock().unwrap().push(CalendarCall::Create(event.summary.clone()));
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
        self.calls.lock().unwrap().push(CalendarCall::Update(event_id.to_string()));
        self.check()?;
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| CopilotError::NotFound(format!("event {event_id}")))?;
        if let Some(summary) = patch.summary {
            event.summary = Some(summary);
        }
        if let Some(start) = patch.start {
            event.start = start;
        }
        if let Some(end) = patch.end {
            event.end = end;
        }
        if let Some(description) = patch.description {
            event.description = Some(description);
        }
        if let Some(location) = patch.location {
            event.location = Some(location);
        }
        Ok(event.clone())
    }

    async fn delete_event(&self, event_id: &str) -> DomainResult<()> {
        self.calls.lock().unwrap().push(CalendarCall::Delete(event_id.to_string()));
        self.check()?;
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|e| e.id != event_id);
        if events.len() == before {
            return Err(CopilotError::NotFound(format!("event {event_id}")));
        }
        Ok(())
    }
}
