//! Retrying HTTP client used by every outbound adapter

use std::time::Duration;

use calcopilot_domain::{CopilotError, Result};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use tracing::debug;

use crate::errors::InfraError;

/// Outbound HTTP client shared by every adapter.
///
/// Safe requests (`GET`, `HEAD`, `OPTIONS`) that fail at the transport
/// level, or answer 5xx or 429, are retried with exponential backoff until
/// `max_attempts` is reached. Anything that may change remote state is sent
/// once unless the caller opts in with [`HttpClient::send_replayable`]. The
/// last response is returned as-is so callers can read provider error
/// payloads.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client with the default timeout and retry policy.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute `builder`, retrying transient failures of safe methods only.
    ///
    /// A `POST` that timed out may still have been applied upstream, so
    /// creates and deletes are never replayed here.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        self.send_with_policy(builder, false).await
    }

    /// Execute `builder`, retrying transient failures whatever the method.
    ///
    /// For requests without remote side effects, such as token exchanges or
    /// completions. Streaming bodies cannot be replayed; buffer the body
    /// (e.g. with `.json(..)`) before calling this.
    pub async fn send_replayable(&self, builder: RequestBuilder) -> Result<Response> {
        self.send_with_policy(builder, true).await
    }

    async fn send_with_policy(&self, builder: RequestBuilder, replayable: bool) -> Result<Response> {
        let attempts = self.max_attempts.max(1);

        for attempt in 1..=attempts {
            let request = builder
                .try_clone()
                .ok_or_else(|| {
                    CopilotError::Internal("request body cannot be cloned for retries".into())
                })?
                .build()
                .map_err(InfraError::from)?;

            let method = request.method().clone();
            let url = redact(request.url());
            debug!(attempt, %method, %url, "sending HTTP request");

            let last = attempt == attempts || !(replayable || method.is_safe());
            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");
                    if is_retryable_status(status) && !last {
                        self.sleep_with_backoff(attempt).await;
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt, %method, %url, error = %err, "HTTP request failed");
                    if !last && is_retryable_error(&err) {
                        self.sleep_with_backoff(attempt).await;
                        continue;
                    }
                    return Err(InfraError::from(err).into());
                }
            }
        }

        Err(CopilotError::Internal("http client exhausted retries without a response".into()))
    }

    fn backoff_delay(&self, attempt: usize) -> Duration {
        let shift = attempt.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1u32 << shift)
    }

    async fn sleep_with_backoff(&self, attempt: usize) {
        let delay = self.backoff_delay(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// URL without its query string, which may carry credentials.
fn redact(url: &reqwest::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            user_agent: Some(concat!("calcopilot/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

impl HttpClientBuilder {
    /// Whole-request timeout, including reading the body.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        let client = builder.build().map_err(InfraError::from)?;

        Ok(HttpClient { client, max_attempts: self.max_attempts, base_backoff: self.base_backoff })
    }
}
