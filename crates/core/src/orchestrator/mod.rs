//! Tool orchestrator
//!
//! A run alternates between asking the model for a turn and executing the
//! tool calls it requests, up to a fixed number of tool rounds, then streams
//! one final answer without tools.

pub mod ports;
pub mod prompt;
pub mod service;

pub use ports::{AssistantTurn, CompletionProvider, TextStream};
pub use prompt::build_system_prompt;
pub use service::{OrchestrationOutcome, Orchestrator, OrchestratorState};
