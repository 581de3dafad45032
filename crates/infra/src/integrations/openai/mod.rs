//! OpenAI Chat Completions adapter
//!
//! Implements [`CompletionProvider`](calcopilot_core::CompletionProvider):
//! tool-enabled turns go through the regular endpoint, the final answer is
//! streamed as server-sent events.
//!
//! # Error Handling
//!
//! - **Network errors and 5xx**: retried by [`HttpClient`](crate::http::HttpClient)
//! - **401/403**: [`OpenAIError::Authentication`]
//! - **429**: [`OpenAIError::RateLimit`] once retries are exhausted
//! - **Other non-2xx**: [`OpenAIError::Api`] with the response body

pub mod client;
mod sse;
pub mod types;

pub use client::OpenAIClient;
pub use types::OpenAIError;
