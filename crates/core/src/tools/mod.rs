//! Agent tool catalog
//!
//! Every operation the model may invoke is declared here with a JSON input
//! schema and backed by a [`ToolHandler`]. The [`ToolRegistry`] maps names to
//! handlers and turns every failure into a structured `{"error": ...}` result
//! that is fed back to the model.

pub mod calendar;
pub mod email;
pub mod registry;
pub mod schemas;
pub mod travel;

use async_trait::async_trait;
use calcopilot_domain::{impl_domain_status_conversions, CopilotError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use email::draft_from_arguments;
pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use schemas::tool_definitions;

/// Names of the tools offered to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    GetEvents,
    CreateCalendarEvent,
    UpdateCalendarEvent,
    DeleteCalendarEvent,
    GetFreeSlots,
    PrepareEmailDraft,
    SearchFlights,
    GetWeatherForecast,
}

impl_domain_status_conversions!(ToolName {
    GetEvents => "get_events",
    CreateCalendarEvent => "create_calendar_event",
    UpdateCalendarEvent => "update_calendar_event",
    DeleteCalendarEvent => "delete_calendar_event",
    GetFreeSlots => "get_free_slots",
    PrepareEmailDraft => "prepare_email_draft",
    SearchFlights => "search_flights",
    GetWeatherForecast => "get_weather_forecast",
});

impl ToolName {
    pub const ALL: [Self; 8] = [
        Self::GetEvents,
        Self::CreateCalendarEvent,
        Self::UpdateCalendarEvent,
        Self::DeleteCalendarEvent,
        Self::GetFreeSlots,
        Self::PrepareEmailDraft,
        Self::SearchFlights,
        Self::GetWeatherForecast,
    ];

    /// Whether a call to this tool changes the user's calendar.
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            Self::CreateCalendarEvent | Self::UpdateCalendarEvent | Self::DeleteCalendarEvent
        )
    }

    /// Whether this tool needs a signed-in calendar.
    pub fn needs_calendar(self) -> bool {
        matches!(
            self,
            Self::GetEvents
                | Self::CreateCalendarEvent
                | Self::UpdateCalendarEvent
                | Self::DeleteCalendarEvent
                | Self::GetFreeSlots
        )
    }
}

/// Tool declaration as handed to the completion provider
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: ToolName,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Executes one tool call with already-parsed JSON arguments
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, args: Value) -> Result<Value>;
}

pub(crate) fn parse_args<T: DeserializeOwned>(tool: ToolName, args: Value) -> Result<T> {
    serde_json::from_value(args)
        .map_err(|e| CopilotError::InvalidInput(format!("Invalid arguments for {tool}: {e}")))
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| CopilotError::Internal(e.to_string()))
}

/// Empty strings from the model mean "not provided".
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
