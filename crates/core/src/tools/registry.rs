//! Name-to-handler dispatch for tool calls

use std::collections::HashMap;
use std::sync::Arc;

use calcopilot_domain::constants::SIGNED_OUT_MESSAGE;
use calcopilot_domain::{FreeBusyConfig, ToolCall};
use chrono_tz::Tz;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::calendar::{
    CreateEventTool, DeleteEventTool, FreeSlotsTool, GetEventsTool, UpdateEventTool,
};
use super::email::PrepareDraftTool;
use super::schemas::tool_definitions;
use super::travel::{SearchFlightsTool, WeatherForecastTool};
use super::{ToolDefinition, ToolHandler, ToolName};
use crate::calendar_ports::CalendarPort;
use crate::travel_ports::{FlightSearchPort, WeatherPort};

/// Tools available to one chat request
///
/// Every tool is always declared to the model. Tools whose collaborator is
/// missing answer with an error result instead of being hidden.
pub struct ToolRegistry {
    definitions: Vec<ToolDefinition>,
    handlers: HashMap<ToolName, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn builder(timezone: Tz) -> ToolRegistryBuilder {
        ToolRegistryBuilder {
            timezone,
            free_busy: FreeBusyConfig::default(),
            calendar: None,
            flights: None,
            weather: None,
        }
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn has_handler(&self, tool: ToolName) -> bool {
        self.handlers.contains_key(&tool)
    }

    /// Run one tool call. Never fails: problems become `{"error": ...}`.
    pub async fn dispatch(&self, call: &ToolCall) -> Value {
        let Ok(tool) = call.name.parse::<ToolName>() else {
            warn!(tool = %call.name, "model requested an unknown tool");
            return error_result(format!("Unknown tool: {}", call.name));
        };

        let Some(handler) = self.handlers.get(&tool) else {
            return if tool.needs_calendar() {
                error_result(SIGNED_OUT_MESSAGE.to_string())
            } else {
                error_result(format!("{tool} is not available right now."))
            };
        };

        let args = match parse_arguments(&call.arguments) {
            Ok(args) => args,
            Err(e) => {
                warn!(tool = %tool, error = %e, "tool arguments are not valid JSON");
                return error_result(format!("Invalid arguments for {tool}: {e}"));
            }
        };

        debug!(tool = %tool, call_id = %call.id, "executing tool");
        match handler.call(args).await {
            Ok(result) => result,
            Err(err) => {
                warn!(tool = %tool, call_id = %call.id, error = %err, "tool call failed");
                error_result(err.detail().to_string())
            }
        }
    }
}

fn parse_arguments(raw: &str) -> serde_json::Result<Value> {
    if raw.trim().is_empty() {
        Ok(json!({}))
    } else {
        serde_json::from_str(raw)
    }
}

fn error_result(message: String) -> Value {
    json!({ "error": message })
}

/// Wires collaborators into a [`ToolRegistry`]
pub struct ToolRegistryBuilder {
    timezone: Tz,
    free_busy: FreeBusyConfig,
    calendar: Option<Arc<dyn CalendarPort>>,
    flights: Option<Arc<dyn FlightSearchPort>>,
    weather: Option<Arc<dyn WeatherPort>>,
}

impl ToolRegistryBuilder {
    #[must_use]
    pub fn with_free_busy_config(mut self, config: FreeBusyConfig) -> Self {
        self.free_busy = config;
        self
    }

    /// Calendar of the signed-in user; leave unset when signed out.
    #[must_use]
    pub fn with_calendar(mut self, calendar: Arc<dyn CalendarPort>) -> Self {
        self.calendar = Some(calendar);
        self
    }

    #[must_use]
    pub fn with_flights(mut self, flights: Arc<dyn FlightSearchPort>) -> Self {
        self.flights = Some(flights);
        self
    }

    #[must_use]
    pub fn with_weather(mut self, weather: Arc<dyn WeatherPort>) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn build(self) -> ToolRegistry {
        let tz = self.timezone;
        let mut handlers: HashMap<ToolName, Arc<dyn ToolHandler>> = HashMap::new();

        if let Some(calendar) = self.calendar {
            handlers.insert(ToolName::GetEvents, Arc::new(GetEventsTool::new(calendar.clone(), tz)));
            handlers.insert(
                ToolName::CreateCalendarEvent,
                Arc::new(CreateEventTool::new(calendar.clone(), tz)),
            );
            handlers.insert(
                ToolName::UpdateCalendarEvent,
                Arc::new(UpdateEventTool::new(calendar.clone(), tz)),
            );
            handlers.insert(
                ToolName::DeleteCalendarEvent,
                Arc::new(DeleteEventTool::new(calendar.clone())),
            );
            handlers.insert(
                ToolName::GetFreeSlots,
                Arc::new(FreeSlotsTool::new(calendar, tz, self.free_busy)),
            );
        }
        handlers.insert(ToolName::PrepareEmailDraft, Arc::new(PrepareDraftTool));
        if let Some(flights) = self.flights {
            handlers.insert(ToolName::SearchFlights, Arc::new(SearchFlightsTool::new(flights)));
        }
        if let Some(weather) = self.weather {
            handlers.insert(ToolName::GetWeatherForecast, Arc::new(WeatherForecastTool::new(weather)));
        }

        ToolRegistry { definitions: tool_definitions(), handlers }
    }
}
