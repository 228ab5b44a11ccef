//! Configuration for the sync engine.

use std::time::Duration;

/// Configuration for sync operations.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the remote authority.
    pub server_url: String,
    /// Interval between scheduled sync attempts.
    pub sync_interval: Duration,
    /// Request timeout handed to the transport.
    pub timeout: Duration,
}

impl SyncConfig {
    /// Creates a new sync configuration for the given server.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            sync_interval: Duration::from_secs(60),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the scheduled sync interval.
    #[must_use]
    pub fn with_sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = interval;
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
        Self::new("")
    }
}
