//! Bounded tool-calling loop

use std::sync::Arc;

use calcopilot_domain::constants::DEFAULT_MAX_TOOL_ITERATIONS;
use calcopilot_domain::{ChatMessage, DraftData, Result};
use futures::future::{self, join_all};
use futures::{stream, StreamExt, TryStreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::ports::{CompletionProvider, TextStream};
use crate::tools::{draft_from_arguments, ToolName, ToolRegistry};

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    AwaitingModel,
    ExecutingTools,
    Streaming,
    Done,
}

/// Result of a run: the answer stream plus the side signals gathered on the
/// way.
pub struct OrchestrationOutcome {
    pub stream: TextStream,
    /// Latched once any calendar-mutating tool was requested.
    pub calendar_modified: bool,
    pub pending_drafts: Vec<DraftData>,
    /// Model turns that requested tools.
    pub iterations: usize,
}

/// Drives a conversation through tool calls to a streamed answer
pub struct Orchestrator {
    provider: Arc<dyn CompletionProvider>,
    max_iterations: usize,
    cancellation: Option<CancellationToken>,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider, max_iterations: DEFAULT_MAX_TOOL_ITERATIONS, cancellation: None }
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Stop forwarding chunks once `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Run the loop for one request.
    ///
    /// Tool failures are handed back to the model as results. A failing
    /// completion call aborts the run.
    pub async fn run(
        &self,
        system_prompt: String,
        history: Vec<ChatMessage>,
        registry: &ToolRegistry,
    ) -> Result<OrchestrationOutcome> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend(history);

        let mut calendar_modified = false;
        let mut pending_drafts = Vec::new();
        let mut iterations = 0;

        for _ in 0..self.max_iterations {
            transition(OrchestratorState::AwaitingModel, iterations);
            let turn = self.provider.complete(&messages, registry.definitions()).await?;
            if !turn.requests_tools() {
                break;
            }
            iterations += 1;
            transition(OrchestratorState::ExecutingTools, iterations);

            let calls = turn.tool_calls;
            for call in &calls {
                match call.name.parse::<ToolName>() {
                    Ok(tool) if tool.is_mutating() => calendar_modified = true,
                    Ok(ToolName::PrepareEmailDraft) => {
                        pending_drafts.extend(draft_from_arguments(&call.arguments));
                    }
                    _ => {}
                }
            }
            messages.push(ChatMessage::assistant_tool_calls(turn.content, calls.clone()));

            let results = join_all(calls.iter().map(|call| async move {
                let result = registry.dispatch(call).await;
                (call.id.as_str(), result)
            }))
            .await;
            for (call_id, result) in results {
                messages.push(ChatMessage::tool_result(call_id, result.to_string()));
            }
        }

        transition(OrchestratorState::Streaming, iterations);
        let chunks = self
            .provider
            .stream(&messages)
            .await?
            .try_filter(|chunk| future::ready(!chunk.is_empty()));
        let stream: TextStream = match &self.cancellation {
            Some(token) => Box::pin(chunks.take_until(token.clone().cancelled_owned())),
            None => Box::pin(chunks),
        };
        let stream = on_exhausted(stream, move || transition(OrchestratorState::Done, iterations));

        Ok(OrchestrationOutcome { stream, calendar_modified, pending_drafts, iterations })
    }
}

fn transition(state: OrchestratorState, iterations: usize) {
    debug!(?state, iterations, "orchestrator state");
}

/// Runs `hook` once `chunks` has yielded its last item.
fn on_exhausted<F>(chunks: TextStream, hook: F) -> TextStream
where
    F: FnOnce() + Send + 'static,
{
    let tail = stream::once(async move {
        hook();
        None::<Result<String>>
    })
    .filter_map(future::ready);
    Box::pin(chunks.chain(tail))
}
