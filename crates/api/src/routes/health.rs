//! `GET /health`

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::context::AppContext;
use crate::utils::health::{ComponentHealth, HealthStatus};

/// Liveness plus the state of the optional integrations. Always 200.
pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<HealthStatus> {
    let chat = if ctx.completion.is_some() {
        ComponentHealth::healthy("chat")
    } else {
        ComponentHealth::unhealthy("chat", "OpenAI API key is not configured")
    };
    let amadeus = &ctx.config.amadeus;
    let flights = if amadeus.api_key.is_some() && amadeus.api_secret.is_some() {
        ComponentHealth::healthy("flights")
    } else {
        ComponentHealth::unhealthy("flights", "Amadeus credentials are not configured")
    };

    Json(HealthStatus::new().add_component(chat).add_component(flights).with_score())
}
