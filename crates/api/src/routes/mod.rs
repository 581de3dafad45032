//! HTTP routes
//!
//! Calendar and Gmail routes need `Authorization: Bearer <google token>`.
//! Chat works without one; the calendar tools then report the user as
//! signed out.

pub mod auth;
pub mod calendar;
pub mod chat;
pub mod error;
pub mod gmail;
pub mod health;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::context::AppContext;

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/chat", post(chat::chat))
        .route("/api/calendar", get(calendar::list_events).post(calendar::create_event))
        .route("/api/calendar/layout", get(calendar::day_layout))
        .route("/api/calendar/analytics", get(calendar::week_analytics))
        .route(
            "/api/calendar/{id}",
            patch(calendar::update_event).delete(calendar::delete_event),
        )
        .route("/api/gmail/draft", post(gmail::save_draft))
        .route("/health", get(health::health))
        .with_state(ctx)
}
