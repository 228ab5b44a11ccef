//! Server configuration.

use std::path::{Path, PathBuf};

/// Configuration for the liftlog server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `0.0.0.0:3000`.
    pub bind_addr: String,
    /// Path of the JSON snapshot file backing the store.
    pub data_path: PathBuf,
    /// Maximum entries accepted in a single sync batch.
    pub max_batch_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            data_path: PathBuf::from("data/exercises.json"),
            max_batch_size: 1000,
        }
    }
}

impl ServerConfig {
    /// Creates a config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bind address.
    #[must_use]
    pub fn with_bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    /// Sets the snapshot file path.
    #[must_use]
    pub fn with_data_path(mut self, path: impl AsRef<Path>) -> Self {
        self.data_path = path.as_ref().to_path_buf();
        self
    }

    /// Sets the maximum batch size.
    #[must_use]
    pub fn with_max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = max;
        self
    }
}
