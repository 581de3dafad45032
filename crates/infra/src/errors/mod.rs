//! Error conversions from third-party crates into [`CopilotError`].
//!
//! [`CopilotError`]: calcopilot_domain::CopilotError

mod conversions;

pub use conversions::InfraError;
