use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calcopilot_core::{AssistantTurn, CompletionProvider, TextStream, ToolDefinition};
use calcopilot_domain::{ChatMessage, CopilotError, Result as DomainResult};

/// Completion provider that replays scripted turns.
///
/// Once the script runs out it answers in plain text, unless `repeat` is set,
/// in which case the last scripted turn is returned forever.
#[derive(Default, Clone)]
pub struct ScriptedProvider {
    turns: Arc<Mutex<VecDeque<AssistantTurn>>>,
    repeat: Option<AssistantTurn>,
    chunks: Vec<String>,
    fail_complete: bool,
    completions: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    streamed: Arc<Mutex<Option<Vec<ChatMessage>>>>,
}

impl ScriptedProvider {
    pub fn new(turns: Vec<AssistantTurn>) -> Self {
        Self { turns: Arc::new(Mutex::new(turns.into())), ..Self::default() }
    }

    /// Requests the same tool calls on every turn.
    pub fn always(turn: AssistantTurn) -> Self {
        Self { repeat: Some(turn), ..Self::default() }
    }

    pub fn failing() -> Self {
        Self { fail_complete: true, ..Self::default() }
    }

    pub fn with_chunks(mut self, chunks: &[&str]) -> Self {
        self.chunks = chunks.iter().map(|c| (*c).to_string()).collect();
        self
    }

    pub fn completion_count(&self) -> usize {
        self.completions.lock().unwrap().len()
    }

    /// Messages passed to the nth `complete` call.
    pub fn completion(&self, n: usize) -> Vec<ChatMessage> {
        self.completions.lock().unwrap()[n].clone()
    }

    pub fn streamed_messages(&self) -> Option<Vec<ChatMessage>> {
        self.streamed.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> DomainResult<AssistantTurn> {
        self.completions.lock().unwrap().push(messages.to_vec());
        if self.fail_complete {
            return Err(CopilotError::Upstream("model unavailable".into()));
        }
        if let Some(turn) = &self.repeat {
            return Ok(turn.clone());
        }
        Ok(self
            .turns
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| AssistantTurn::text("All done.")))
    }

    async fn stream(&self, messages: &[ChatMessage]) -> DomainResult<TextStream> {
        *self.streamed.lock().unwrap() = Some(messages.to_vec());
        let chunks: Vec<DomainResult<String>> = self.chunks.iter().cloned().map(Ok).collect();
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}
