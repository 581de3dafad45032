//! `POST /api/chat`: run the orchestrator and stream the answer

use std::convert::Infallible;
use std::future;
use std::sync::Arc;
use std::time::Instant;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use calcopilot_core::{build_system_prompt, Orchestrator};
use calcopilot_domain::{build_preferences_context, ChatRequest, CopilotError, DraftData};
use futures::StreamExt;
use tracing::{debug, error, info};

use super::auth::bearer_token;
use super::error::ErrorResponse;
use crate::context::AppContext;
use crate::utils::logging::{error_label, log_request_outcome};

pub const CALENDAR_MODIFIED_HEADER: &str = "x-calendar-modified";
pub const DRAFT_DATA_HEADER: &str = "x-draft-data";

/// Shown to the user for any failure before streaming starts.
pub const FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

const ROUTE: &str = "chat";

pub async fn chat(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();

    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            debug!(error = %err, "rejecting malformed chat request");
            log_request_outcome(ROUTE, started.elapsed(), false);
            let body = ErrorResponse { error: "Invalid messages".into() };
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    match run(&ctx, request, bearer_token(&headers)).await {
        Ok(response) => {
            log_request_outcome(ROUTE, started.elapsed(), true);
            response
        }
        Err(err) => {
            error!(kind = error_label(&err), error = %err, "chat request failed");
            log_request_outcome(ROUTE, started.elapsed(), false);
            (StatusCode::INTERNAL_SERVER_ERROR, text_headers(), FAILURE_MESSAGE).into_response()
        }
    }
}

async fn run(
    ctx: &AppContext,
    request: ChatRequest,
    access_token: Option<String>,
) -> calcopilot_domain::Result<Response> {
    let provider = ctx
        .completion
        .clone()
        .ok_or_else(|| CopilotError::Config("OpenAI API key is not configured".into()))?;

    let tz = ctx.resolve_timezone(request.timezone.as_deref());
    let preferences = match (request.user_preferences_context, request.preferences) {
        (Some(context), _) => context,
        (None, Some(prefs)) => build_preferences_context(&prefs),
        (None, None) => String::new(),
    };
    let system_prompt = build_system_prompt(ctx.clock.utc_now(), tz, &preferences);
    let registry = ctx.tool_registry(tz, access_token.as_deref());

    let orchestrator =
        Orchestrator::new(provider).with_max_iterations(ctx.config.orchestrator.max_iterations);
    let outcome = orchestrator.run(system_prompt, request.messages, &registry).await?;

    info!(
        iterations = outcome.iterations,
        calendar_modified = outcome.calendar_modified,
        drafts = outcome.pending_drafts.len(),
        signed_in = access_token.is_some(),
        "chat answer streaming"
    );

    let mut headers = text_headers();
    headers.insert(
        CALENDAR_MODIFIED_HEADER,
        HeaderValue::from_static(if outcome.calendar_modified { "true" } else { "false" }),
    );
    if let Some(value) = draft_header(&outcome.pending_drafts)? {
        headers.insert(DRAFT_DATA_HEADER, value);
    }

    // A failing chunk ends the answer; what was sent stays sent.
    let chunks = outcome
        .stream
        .take_while(|chunk| {
            if let Err(err) = chunk {
                error!(error = %err, "completion stream failed");
            }
            future::ready(chunk.is_ok())
        })
        .map(|chunk| Ok::<_, Infallible>(Bytes::from(chunk.unwrap_or_default())));

    Ok((headers, Body::from_stream(chunks)).into_response())
}

fn text_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    headers
}

/// Percent-encoded JSON array of drafts, or `None` when there are none.
fn draft_header(drafts: &[DraftData]) -> calcopilot_domain::Result<Option<HeaderValue>> {
    if drafts.is_empty() {
        return Ok(None);
    }
    let json = serde_json::to_string(drafts)
        .map_err(|e| CopilotError::Internal(format!("draft serialization failed: {e}")))?;
    let value = HeaderValue::from_str(&urlencoding::encode(&json))
        .map_err(|e| CopilotError::Internal(format!("invalid draft header: {e}")))?;
    Ok(Some(value))
}
