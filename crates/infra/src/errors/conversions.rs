//! Conversions from external infrastructure errors into domain errors.

use calcopilot_domain::CopilotError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CopilotError);

impl From<InfraError> for CopilotError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CopilotError> for InfraError {
    fn from(value: CopilotError) -> Self {
        InfraError(value)
    }
}

trait IntoCopilotError {
    fn into_copilot(self) -> CopilotError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CopilotError */
/* -------------------------------------------------------------------------- */

impl IntoCopilotError for HttpError {
    fn into_copilot(self) -> CopilotError {
        if self.is_timeout() {
            return CopilotError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return CopilotError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return CopilotError::Upstream(format!("HTTP response could not be decoded: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => CopilotError::Auth(message),
                404 => CopilotError::NotFound(message),
                400..=499 => CopilotError::InvalidInput(message),
                _ => CopilotError::Upstream(message),
            };
        }

        CopilotError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_copilot())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → CopilotError */
/* -------------------------------------------------------------------------- */

impl IntoCopilotError for JsonError {
    fn into_copilot(self) -> CopilotError {
        CopilotError::Upstream(format!("unexpected response payload: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_copilot())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
