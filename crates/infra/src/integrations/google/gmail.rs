//! Gmail draft storage

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use calcopilot_core::DraftMailbox;
use calcopilot_domain::{DraftData, Result};
use reqwest::Method;
use tracing::{debug, info};

use super::types::{DraftRequest, DraftResponse, RawMessage};
use super::{google_error, join_segments, read_json};
use crate::http::HttpClient;

/// Where the user reviews saved drafts
pub const DRAFTS_LINK: &str = "https://mail.google.com/mail/u/0/#drafts";

#[derive(Clone)]
pub struct GmailClient {
    http: HttpClient,
    base_url: String,
}

impl GmailClient {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }
}

/// RFC 2822 plain-text message; `To` is omitted when there is no recipient.
pub(crate) fn compose_message(draft: &DraftData) -> String {
    let mut headers = Vec::with_capacity(4);
    if let Some(to) = draft.to.as_deref().filter(|to| !to.trim().is_empty()) {
        headers.push(format!("To: {to}"));
    }
    headers.push(format!("Subject: {}", draft.subject));
    headers.push("Content-Type: text/plain; charset=utf-8".to_string());
    headers.push("MIME-Version: 1.0".to_string());

    format!("{}\r\n\r\n{}", headers.join("\r\n"), draft.body)
}

#[async_trait]
impl DraftMailbox for GmailClient {
    async fn save_draft(&self, access_token: &str, draft: &DraftData) -> Result<String> {
        let raw = URL_SAFE_NO_PAD.encode(compose_message(draft));
        let url = join_segments(&self.base_url, &["users", "me", "drafts"])?;
        debug!(has_recipient = draft.to.is_some(), "saving Gmail draft");

        let builder = self
            .http
            .request(Method::POST, url)
            .bearer_auth(access_token)
            .json(&DraftRequest { message: RawMessage { raw: &raw } });

        let response = self.http.send(builder).await?;
        if !response.status().is_success() {
            return Err(google_error(response, "Failed to save draft to Gmail").await);
        }

        let saved: DraftResponse = read_json(response).await?;
        info!(draft_id = saved.id.as_deref().unwrap_or("unknown"), "Gmail draft saved");
        Ok(DRAFTS_LINK.to_string())
    }
}
