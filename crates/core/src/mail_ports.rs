//! Email draft storage port

use async_trait::async_trait;
use calcopilot_domain::{DraftData, Result};

/// Saves drafts into the user's mailbox without sending them
#[async_trait]
pub trait DraftMailbox: Send + Sync {
    /// Store the draft and return a link to the drafts folder.
    async fn save_draft(&self, access_token: &str, draft: &DraftData) -> Result<String>;
}
