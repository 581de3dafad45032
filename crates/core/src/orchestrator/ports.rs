//! Completion provider port

use std::pin::Pin;

use async_trait::async_trait;
use calcopilot_domain::{ChatMessage, Result, ToolCall};
use futures::Stream;

use crate::tools::ToolDefinition;

/// Text chunks of a streamed completion, in arrival order
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// One non-streaming model turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssistantTurn {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl AssistantTurn {
    pub fn text(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), tool_calls: Vec::new() }
    }

    pub fn with_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self { content: None, tool_calls }
    }

    pub fn requests_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Language-model completions
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// One turn with the given tools on offer; the model may answer in text
    /// or request tool calls.
    async fn complete(&self, messages: &[ChatMessage], tools: &[ToolDefinition])
        -> Result<AssistantTurn>;

    /// Stream the final answer. No tools are offered.
    async fn stream(&self, messages: &[ChatMessage]) -> Result<TextStream>;
}
