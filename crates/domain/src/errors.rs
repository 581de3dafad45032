//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Calendar Copilot
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CopilotError {
    /// Caller supplied something we refuse to compute on (bad dates,
    /// non-positive durations, unknown timezones).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A third-party API answered, but with an error payload.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CopilotError {
    /// The message without the category prefix.
    ///
    /// Tool results and user-facing JSON bodies use this so the model and the
    /// UI see `"end_date is before start_date"` rather than
    /// `"Invalid input: end_date is before start_date"`.
    pub fn detail(&self) -> &str {
        match self {
            Self::InvalidInput(msg)
            | Self::Config(msg)
            | Self::Network(msg)
            | Self::Auth(msg)
            | Self::NotFound(msg)
            | Self::Upstream(msg)
            | Self::Internal(msg) => msg,
        }
    }

    /// Whether the error was caused by the caller rather than by us or a
    /// collaborator.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Result type alias for Calendar Copilot operations
pub type Result<T> = std::result::Result<T, CopilotError>;
