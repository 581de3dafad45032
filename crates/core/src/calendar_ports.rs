//! Calendar port interfaces
//!
//! The calendar is always the signed-in user's primary calendar. Adapters
//! authenticate with a per-request access token, so the registry gets its
//! calendar through a [`CalendarConnector`] rather than a shared client.

use std::sync::Arc;

use async_trait::async_trait;
use calcopilot_domain::{CalendarEvent, EventPatch, EventWindow, NewEvent, Result};

/// Read and write access to one user's primary calendar
#[async_trait]
pub trait CalendarPort: Send + Sync {
    /// Events overlapping the window, recurring events expanded, ordered by
    /// start time.
    async fn list_events(&self, window: EventWindow, max_results: u32) -> Result<Vec<CalendarEvent>>;

    async fn create_event(&self, event: NewEvent) -> Result<CalendarEvent>;

    /// Apply only the fields present in `patch`.
    async fn update_event(&self, event_id: &str, patch: EventPatch) -> Result<CalendarEvent>;

    async fn delete_event(&self, event_id: &str) -> Result<()>;
}

/// Builds a calendar client bound to an access token
pub trait CalendarConnector: Send + Sync {
    fn connect(&self, access_token: &str) -> Arc<dyn CalendarPort>;
}
