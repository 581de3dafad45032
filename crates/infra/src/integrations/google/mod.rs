//! Google Calendar and Gmail adapters
//!
//! Both authenticate with the signed-in user's OAuth access token, passed in
//! per request. Token acquisition and refresh happen upstream.

pub mod calendar;
pub mod gmail;
mod types;

pub use calendar::{GoogleCalendarClient, GoogleCalendarConnector};
pub use gmail::{GmailClient, DRAFTS_LINK};

use calcopilot_domain::{CopilotError, Result};
use reqwest::{Response, StatusCode};
use tracing::warn;
use url::Url;

use crate::errors::InfraError;

/// Map a non-2xx Google response to a domain error.
///
/// Uses `error.message` from the body when present, `fallback` otherwise.
pub(crate) async fn google_error(response: Response, fallback: &str) -> CopilotError {
    let status = response.status();
    let message = response
        .json::<types::GoogleErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());

    warn!(status = status.as_u16(), error = %message, "Google API request failed");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CopilotError::Auth(message),
        StatusCode::NOT_FOUND | StatusCode::GONE => CopilotError::NotFound(message),
        s if s.is_client_error() => CopilotError::InvalidInput(message),
        _ => CopilotError::Upstream(message),
    }
}

/// `base` with `segments` appended, percent-encoding each one.
pub(crate) fn join_segments(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| CopilotError::Config(format!("Invalid Google API URL {base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| CopilotError::Config(format!("Google API URL cannot be a base: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    Ok(response.json::<T>().await.map_err(InfraError::from)?)
}
