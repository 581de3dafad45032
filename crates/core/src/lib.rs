//! # Calendar Copilot Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Timezone math, the free/busy engine, the day layout algorithm and
//!   weekly meeting statistics
//! - The agent tool catalog and the bounded tool-calling orchestrator
//! - Port interfaces (traits) for calendar, mail, travel and model access
//!
//! ## Architecture Principles
//! - Only depends on `calcopilot-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits

pub mod analytics;
pub mod free_busy;
pub mod layout;
pub mod orchestrator;
pub mod timezone;
pub mod tools;
pub mod travel;

// Infrastructure ports
pub mod calendar_ports;
pub mod mail_ports;
pub mod travel_ports;

pub use analytics::week_stats;
pub use calendar_ports::{CalendarConnector, CalendarPort};
pub use free_busy::{busy_intervals_from_events, compute_free_slots, validate_query};
pub use layout::{layout_day, timed_events_for_day};
pub use mail_ports::DraftMailbox;
pub use orchestrator::{
    build_system_prompt, AssistantTurn, CompletionProvider, OrchestrationOutcome, Orchestrator,
    OrchestratorState, TextStream,
};
pub use tools::{ToolDefinition, ToolHandler, ToolName, ToolRegistry};
pub use travel_ports::{FlightSearchPort, WeatherPort};
