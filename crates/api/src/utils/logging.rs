//! Request logging helpers

use std::time::Duration;

use calcopilot_domain::CopilotError;
use tracing::{info, warn};

/// Log the outcome of one request with structured fields.
///
/// `route` should be a stable identifier such as `"calendar::list"`; never
/// pass tokens or user content.
#[inline]
pub fn log_request_outcome(route: &str, elapsed: Duration, success: bool) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    if success {
        info!(route, duration_ms, "request_success");
    } else {
        warn!(route, duration_ms, "request_failure");
    }
}

/// Stable label for an error, suitable for log fields.
#[inline]
pub fn error_label(error: &CopilotError) -> &'static str {
    match error {
        CopilotError::InvalidInput(_) => "invalid_input",
        CopilotError::Config(_) => "config",
        CopilotError::Network(_) => "network",
        CopilotError::Auth(_) => "auth",
        CopilotError::NotFound(_) => "not_found",
        CopilotError::Upstream(_) => "upstream",
        CopilotError::Internal(_) => "internal",
    }
}
