//! Configuration for the sync engine.

use std::time::Duration;

/// Default remote endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";

/// Default number of remote records taken per sync.
pub const DEFAULT_FETCH_LIMIT: usize = 5;

/// Configuration for sync operations.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Remote endpoint URL.
    pub endpoint: String,
    /// Maximum number of records taken from one fetch.
    pub fetch_limit: usize,
    /// Interval between scheduled syncs.
    pub interval: Duration,
    /// Request timeout.
    pub timeout: Duration,
}

impl SyncConfig {
    /// Creates a new sync configuration for `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            interval: Duration::from_secs(30),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the fetch limit.
    #[must_use]
    pub fn with_fetch_limit(mut self, limit: usize) -> Self {
        self.fetch_limit = limit;
        self
    }

    /// Sets the interval for scheduled sync.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.fetch_limit, 5);
        assert_eq!(config.interval, Duration::from_secs(30));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn builder() {
        let config = SyncConfig::new("http://localhost:8080/quotes")
            .with_fetch_limit(10)
            .with_interval(Duration::from_secs(5))
            .with_timeout(Duration::from_secs(2));

        assert_eq!(config.endpoint, "http://localhost:8080/quotes");
        assert_eq!(config.fetch_limit, 10);
        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(2));
    }
}
