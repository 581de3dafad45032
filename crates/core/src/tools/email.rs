//! Email drafting tool
//!
//! Drafts are never saved here. The orchestrator surfaces them to the caller,
//! who decides whether to store them in the mailbox.

use async_trait::async_trait;
use calcopilot_domain::{DraftData, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{non_empty, parse_args, ToolHandler, ToolName};

const DRAFT_NOTE: &str =
    "A 'Save to Gmail Drafts' button will appear in the chat for the user to confirm.";

#[derive(Deserialize)]
struct DraftArgs {
    #[serde(default)]
    to: Option<String>,
    subject: String,
    body: String,
}

impl From<DraftArgs> for DraftData {
    fn from(args: DraftArgs) -> Self {
        Self { to: non_empty(args.to), subject: args.subject, body: args.body }
    }
}

/// Draft carried by a `prepare_email_draft` call's raw arguments, if they
/// parse.
pub fn draft_from_arguments(raw_arguments: &str) -> Option<DraftData> {
    serde_json::from_str::<DraftArgs>(raw_arguments).ok().map(DraftData::from)
}

/// `prepare_email_draft`: echoes the draft back for the model to confirm
pub struct PrepareDraftTool;

#[async_trait]
impl ToolHandler for PrepareDraftTool {
    async fn call(&self, args: Value) -> Result<Value> {
        let draft: DraftData = parse_args::<DraftArgs>(ToolName::PrepareEmailDraft, args)?.into();
        Ok(json!({
            "prepared": true,
            "to": draft.to,
            "subject": draft.subject,
            "body": draft.body,
            "note": DRAFT_NOTE,
        }))
    }
}
