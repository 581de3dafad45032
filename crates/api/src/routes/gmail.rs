//! `POST /api/gmail/draft`

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use calcopilot_domain::DraftData;
use serde::Serialize;
use tracing::info;

use super::auth::BearerToken;
use super::error::ApiError;
use crate::context::AppContext;

#[derive(Debug, Serialize)]
pub struct DraftSaved {
    pub success: bool,
    pub drafts_link: String,
}

pub async fn save_draft(
    State(ctx): State<Arc<AppContext>>,
    BearerToken(token): BearerToken,
    payload: Result<Json<DraftData>, JsonRejection>,
) -> Result<Json<DraftSaved>, ApiError> {
    let Json(draft) = payload?;
    if draft.subject.trim().is_empty() || draft.body.trim().is_empty() {
        return Err(ApiError::bad_request("subject and body are required"));
    }

    let drafts_link = ctx.mailbox.save_draft(&token, &draft).await?;
    info!(has_recipient = draft.to.is_some(), "gmail draft saved");
    Ok(Json(DraftSaved { success: true, drafts_link }))
}
