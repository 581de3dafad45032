//! # Calendar Copilot Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Configuration loading (file + environment)
//! - The shared retrying HTTP client
//! - External service integrations (OpenAI, Google Calendar/Gmail, Amadeus,
//!   Open-Meteo)
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `calcopilot-core`
//! - Depends on `calcopilot-domain` and `calcopilot-common`
//! - Contains all "impure" code (network and filesystem I/O)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::*;
pub use observability::init_tracing;
