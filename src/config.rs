use crate::constants::{
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_LIMIT, DEFAULT_PORT, DEFAULT_SOURCE_URL,
    MAX_RETRY_BACKOFF_MS,
};
use crate::error::Result;
use crate::services::{HttpFetcher, RetryPolicy};
use std::time::Duration;

/// Where the CSV comes from and how hard to try fetching it
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub url: String,

    /// Per-request timeout
    pub timeout: Duration,

    pub retry: RetryPolicy,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

impl SourceConfig {
    pub fn new(url: String, timeout_secs: u64, attempts: u32, backoff_ms: u64) -> Self {
        Self {
            url,
            timeout: Duration::from_secs(timeout_secs.max(1)),
            retry: RetryPolicy {
                max_attempts: attempts.max(1),
                initial_backoff: Duration::from_millis(backoff_ms),
                max_backoff: Duration::from_millis(MAX_RETRY_BACKOFF_MS.max(backoff_ms)),
            },
        }
    }

    pub fn fetcher(&self) -> Result<HttpFetcher> {
        HttpFetcher::new(self.url.clone(), self.timeout, self.retry)
    }
}

/// Settings for the `serve` command
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,

    /// Largest page size a client may ask for (0 disables the cap)
    pub max_limit: usize,

    pub source: SourceConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_limit: DEFAULT_MAX_LIMIT,
            source: SourceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_FETCH_ATTEMPTS, DEFAULT_RETRY_BACKOFF_MS};

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_limit, DEFAULT_MAX_LIMIT);
        assert_eq!(config.source.url, DEFAULT_SOURCE_URL);
        assert_eq!(config.source.retry.max_attempts, DEFAULT_FETCH_ATTEMPTS);
        assert_eq!(
            config.source.retry.initial_backoff,
            Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS)
        );
    }

    #[test]
    fn test_source_config_floors() {
        let source = SourceConfig::new("http://localhost/dump.csv".into(), 0, 0, 50);
        assert_eq!(source.timeout, Duration::from_secs(1));
        assert_eq!(source.retry.max_attempts, 1);
        assert!(source.fetcher().is_ok());
    }

    #[test]
    fn test_bad_url_rejected_by_fetcher() {
        let source = SourceConfig::new("not-a-url".into(), 5, 1, 0);
        assert!(source.fetcher().is_err());
    }
}
