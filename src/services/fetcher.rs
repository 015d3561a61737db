use crate::constants::{DEFAULT_FETCH_ATTEMPTS, DEFAULT_RETRY_BACKOFF_MS, MAX_RETRY_BACKOFF_MS};
use crate::error::{AppError, Result};
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Anything that can hand back the raw CSV text.
///
/// The HTTP fetcher is the production source; tests plug in fixtures.
pub trait CsvSource: Send + Sync {
    /// Human-readable origin for logs
    fn describe(&self) -> String;

    fn fetch(&self) -> impl Future<Output = Result<String>> + Send;
}

/// Bounded exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first try included. Zero is treated as one.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_FETCH_ATTEMPTS,
            initial_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
            max_backoff: Duration::from_millis(MAX_RETRY_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no waiting
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay after the given failed attempt (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Outcome of a single attempt: retryable failures go around again
#[derive(Debug)]
pub enum AttemptError {
    Transient(AppError),
    Permanent(AppError),
}

impl AttemptError {
    fn into_inner(self) -> AppError {
        match self {
            AttemptError::Transient(e) | AttemptError::Permanent(e) => e,
        }
    }
}

/// Run `op` until it succeeds, fails permanently, or runs out of attempts.
pub async fn retry_with_backoff<T, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = std::result::Result<T, AttemptError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(AttemptError::Transient(e)) if attempt < max_attempts => {
                let delay = policy.backoff_for(attempt);
                warn!(
                    label,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Attempt failed, retrying"
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e.into_inner()),
        }
    }
}

/// Downloads the index dump over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
    retry: RetryPolicy,
}

impl HttpFetcher {
    /// Create a fetcher for `url` with a per-request `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let url = url.into().trim().to_string();

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "Invalid source url: must start with http:// or https://, got: '{}'",
                url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        debug!(url = %url, timeout_secs = timeout.as_secs(), "Created HTTP fetcher");

        Ok(Self { client, url, retry })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_once(&self) -> std::result::Result<String, AttemptError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AttemptError::Transient(AppError::from(e)))?;

        let status = response.status();
        if !status.is_success() {
            let err = AppError::Fetch(format!("{} returned status {}", self.url, status));
            return Err(if is_retryable_status(status) {
                AttemptError::Transient(err)
            } else {
                AttemptError::Permanent(err)
            });
        }

        response
            .text()
            .await
            .map_err(|e| AttemptError::Transient(AppError::from(e)))
    }
}

impl CsvSource for HttpFetcher {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String> {
        info!(url = %self.url, "Fetching source CSV");
        let body = retry_with_backoff(&self.retry, &self.url, |_| self.fetch_once()).await?;
        info!(url = %self.url, bytes = body.len(), "Fetched source CSV");
        Ok(body)
    }
}

/// Server errors, timeouts and throttling are worth another try; other
/// client errors will not fix themselves.
fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
}
