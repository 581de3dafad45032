//! JSON error responses for the HTTP routes

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use calcopilot_domain::CopilotError;
use serde::Serialize;
use tracing::error;

use crate::utils::logging::error_label;

/// Body for failures whose detail stays in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error body shared by every JSON route: `{ "error": "<message>" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

impl From<CopilotError> for ApiError {
    fn from(err: CopilotError) -> Self {
        let status = match &err {
            CopilotError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CopilotError::Auth(_) => StatusCode::UNAUTHORIZED,
            CopilotError::NotFound(_) => StatusCode::NOT_FOUND,
            CopilotError::Network(_) | CopilotError::Upstream(_) => StatusCode::BAD_GATEWAY,
            CopilotError::Config(_) | CopilotError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            error!(kind = error_label(&err), error = %err, "request failed");
        }
        match err {
            CopilotError::Config(_) | CopilotError::Internal(_) => {
                Self::new(status, INTERNAL_ERROR_MESSAGE)
            }
            other => Self::new(status, other.detail()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}
