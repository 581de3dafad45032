//! # Calendar Copilot Domain
//!
//! Business domain types and models for Calendar Copilot.
//!
//! This crate contains:
//! - Interval, layout, calendar and conversation types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - User preferences and their prompt rendering
//!
//! ## Architecture
//! - No dependencies on other Calendar Copilot crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod preferences;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use preferences::{build_preferences_context, RecurringActivity, UserPreferences};
pub use types::*;
