//! # Calendar Copilot API
//!
//! HTTP application layer - routes and service wiring.
//!
//! This crate contains:
//! - axum routes (chat streaming, calendar, Gmail drafts, health)
//! - Application context (dependency injection)
//! - The `calcopilot` server binary
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires the infra adapters into the core ports
//! - Maps domain errors onto HTTP status codes

pub mod context;
pub mod routes;
pub mod utils;

pub use context::*;
pub use routes::router;
