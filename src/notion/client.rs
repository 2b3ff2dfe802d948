//! Notion REST client with exponential backoff retry logic.
//!
//! Every API interaction goes through [`NotionClient`], which wraps a
//! `reqwest` client with the bearer token and the pinned `Notion-Version`
//! header. Requests are retried automatically with exponential backoff and
//! jitter to ride out rate limits and transient failures.
//!
//! # Architecture
//!
//! The module uses a trait-based design:
//! - [`CallApi`]: Core trait defining one async API call
//! - [`JsonRequest`]: One JSON request against the Notion API
//! - [`RetryCall`]: Decorator that adds retry logic to any `CallApi`
//!   implementation
//!
//! # Retry Strategy
//!
//! - Maximum 5 retry attempts
//! - Exponential backoff starting at 1 second
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use crate::utils::truncate_for_log;
use rand::{rng, Rng};
use reqwest::Method;
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// API version pinned on every request.
pub const NOTION_VERSION: &str = "2022-06-28";

const API_BASE: &str = "https://api.notion.com/v1";

/// Authenticated handle to the Notion REST API.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    token: String,
}

impl NotionClient {
    pub fn new(token: impl Into<String>) -> Self {
        NotionClient {
            http: reqwest::Client::new(),
            token: token.into(),
        }
    }

    /// POST a JSON body to an API path (relative to the v1 base), with
    /// backoff.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, Box<dyn Error>> {
        call_with_backoff(self, Method::POST, path, body).await
    }

    /// PATCH a JSON body to an API path, with backoff.
    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value, Box<dyn Error>> {
        call_with_backoff(self, Method::PATCH, path, body).await
    }
}

/// Trait for one async call against the API.
///
/// Implementors produce a parsed JSON response. The abstraction exists so
/// decorators (like retry logic) can wrap any call uniformly.
pub trait CallApi {
    /// Perform the call and return the parsed response body.
    async fn call(&self) -> Result<Value, Box<dyn Error>>;
}

/// Wrapper that adds exponential backoff retry logic to any [`CallApi`]
/// implementation.
///
/// # Backoff Strategy
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryCall<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryCall<T>
where
    T: CallApi,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryCall<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryCall")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> CallApi for RetryCall<T>
where
    T: CallApi + fmt::Debug,
{
    #[instrument(level = "info", skip_all)]
    async fn call(&self) -> Result<Value, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.call().await {
                Ok(resp) => {
                    return Ok(resp);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "API call exhausted retries"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "API call failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// One JSON request against the Notion API, implementing [`CallApi`].
#[derive(Debug)]
pub struct JsonRequest<'a> {
    client: &'a NotionClient,
    method: Method,
    path: &'a str,
    body: &'a Value,
}

impl CallApi for JsonRequest<'_> {
    #[instrument(level = "info", skip_all, fields(method = %self.method, path = %self.path))]
    async fn call(&self) -> Result<Value, Box<dyn Error>> {
        let response = self
            .client
            .http
            .request(self.method.clone(), format!("{}/{}", API_BASE, self.path))
            .bearer_auth(&self.client.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(self.body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(%status, body = %truncate_for_log(&text, 300), "Notion API returned an error");
            return Err(format!(
                "Notion API returned {}: {}",
                status,
                truncate_for_log(&text, 300)
            )
            .into());
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Send one request with exponential backoff retry logic.
///
/// This is the entry point the query and publish modules use for every
/// API call.
///
/// # Retry Behavior
///
/// - Up to 5 retry attempts
/// - Exponential backoff: 1s, 2s, 4s, 8s, 16s (capped at 30s)
/// - Random jitter added to prevent thundering herd
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn call_with_backoff(
    client: &NotionClient,
    method: Method,
    path: &str,
    body: &Value,
) -> Result<Value, Box<dyn Error>> {
    let request = JsonRequest {
        client,
        method,
        path,
        body,
    };
    let api = RetryCall::new(request, 5, StdDuration::from_secs(1));
    api.call().await
}
