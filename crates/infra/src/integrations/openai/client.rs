//! OpenAI chat completions client

use std::collections::VecDeque;

use async_trait::async_trait;
use calcopilot_core::{AssistantTurn, CompletionProvider, TextStream, ToolDefinition};
use calcopilot_domain::{ChatMessage, Result, ToolCall};
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

use super::sse::SseDecoder;
use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, OpenAIError, StreamChunk, WireMessage,
    WireTool,
};
use crate::http::HttpClient;

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI API client
///
/// Speaks the Chat Completions protocol for the orchestrator: function-tool
/// turns and a streamed final answer.
pub struct OpenAIClient {
    http_client: HttpClient,
    api_key: String,
    model: String,
    api_url: String,
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>, http_client: HttpClient) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Build from optional config values; a missing key is a config error.
    pub fn from_settings(
        api_key: Option<&str>,
        api_url: &str,
        model: &str,
        http_client: HttpClient,
    ) -> std::result::Result<Self, OpenAIError> {
        let api_key = api_key.filter(|k| !k.trim().is_empty()).ok_or(OpenAIError::MissingApiKey)?;
        Ok(Self::new(api_key, http_client).with_model(model).with_api_url(api_url))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the endpoint (used by tests against a mock server)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        tools: &'a [ToolDefinition],
        stream: bool,
    ) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: messages.iter().map(WireMessage::from).collect(),
            tools: tools.iter().map(WireTool::from).collect(),
            tool_choice: (!tools.is_empty()).then_some("auto"),
            stream,
        }
    }

    async fn post<B: Serialize>(&self, body: &B) -> std::result::Result<Response, OpenAIError> {
        let builder = self
            .http_client
            .request(Method::POST, &self.api_url)
            .bearer_auth(&self.api_key)
            .json(body);

        let response = self
            .http_client
            .send_replayable(builder)
            .await
            .map_err(|err| OpenAIError::Network(err.detail().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_status(response).await);
        }
        Ok(response)
    }

    /// Map a non-2xx response to an error, keeping the provider's message.
    async fn handle_error_status(response: Response) -> OpenAIError {
        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or(body);

        warn!(status = status.as_u16(), error = %message, "OpenAI request failed");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                OpenAIError::Authentication(message)
            }
            StatusCode::TOO_MANY_REQUESTS => OpenAIError::RateLimit(retry_after),
            _ => OpenAIError::Api { status: status.as_u16(), message },
        }
    }

    async fn complete_inner(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> std::result::Result<AssistantTurn, OpenAIError> {
        let request = self.build_request(messages, tools, false);
        debug!(model = %self.model, messages = messages.len(), tools = tools.len(), "requesting completion");

        let response = self.post(&request).await?;
        let parsed: ChatCompletionResponse =
            response.json().await.map_err(|e| OpenAIError::InvalidSchema(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OpenAIError::InvalidSchema("response has no choices".into()))?;

        let tool_calls: Vec<ToolCall> = choice
            .message
            .tool_calls
            .into_iter()
            .map(|call| ToolCall::new(call.id, call.function.name, call.function.arguments))
            .collect();
        let content = choice.message.content.filter(|c| !c.is_empty());

        debug!(tool_calls = tool_calls.len(), "completion received");
        Ok(AssistantTurn { content, tool_calls })
    }

    async fn stream_inner(
        &self,
        messages: &[ChatMessage],
    ) -> std::result::Result<TextStream, OpenAIError> {
        let request = self.build_request(messages, &[], true);
        debug!(model = %self.model, messages = messages.len(), "opening completion stream");

        let response = self.post(&request).await?;
        Ok(content_stream(response))
    }
}

struct StreamState {
    body: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    failed: bool,
}

/// Turn an SSE response into a stream of non-empty content deltas.
///
/// The stream ends after `[DONE]`, at end of body, or after the first error.
fn content_stream(response: Response) -> TextStream {
    let state = StreamState {
        body: response.bytes_stream().map(|chunk| chunk.map(|b| b.to_vec())).boxed(),
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        failed: false,
    };

    let stream = futures::stream::unfold(state, |mut state| async move {
        if state.failed {
            return None;
        }
        loop {
            while let Some(payload) = state.pending.pop_front() {
                match serde_json::from_str::<StreamChunk>(&payload) {
                    Ok(chunk) => {
                        let text: String =
                            chunk.choices.into_iter().filter_map(|c| c.delta.content).collect();
                        if !text.is_empty() {
                            return Some((Ok(text), state));
                        }
                    }
                    Err(err) => {
                        state.failed = true;
                        let err = OpenAIError::InvalidSchema(err.to_string());
                        return Some((Err(err.into()), state));
                    }
                }
            }
            if state.decoder.is_done() {
                return None;
            }
            match state.body.next().await {
                Some(Ok(bytes)) => state.pending.extend(state.decoder.feed(&bytes)),
                Some(Err(err)) => {
                    state.failed = true;
                    let err = OpenAIError::Network(err.to_string());
                    return Some((Err(err.into()), state));
                }
                None => return None,
            }
        }
    });

    Box::pin(stream)
}

#[async_trait]
impl CompletionProvider for OpenAIClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<AssistantTurn> {
        Ok(self.complete_inner(messages, tools).await?)
    }

    async fn stream(&self, messages: &[ChatMessage]) -> Result<TextStream> {
        Ok(self.stream_inner(messages).await?)
    }
}
