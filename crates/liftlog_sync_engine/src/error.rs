//! Error types for the sync engine.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
///
/// Only [`SyncError::Store`] crosses the engine boundary from
/// `attempt_sync`; every connectivity-related variant is absorbed there
/// and surfaces as a zero-synced outcome.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Network or transport error. Always retryable: the batch stays
    /// unsynced and goes out again on the next attempt.
    #[error("transport error: {0}")]
    Transport(String),

    /// Protocol error (invalid message format).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Local store error during sync.
    #[error("store error: {0}")]
    Store(#[from] liftlog_core::CoreError),

    /// Not connected to the server.
    #[error("not connected to server")]
    NotConnected,
}

impl SyncError {
    /// Returns true if a later attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Transport(_) | SyncError::NotConnected)
    }
}
