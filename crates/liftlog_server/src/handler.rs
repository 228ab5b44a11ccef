//! Typed request handlers over the store.
//!
//! The HTTP layer in [`crate::routes`] is a thin shell around this type,
//! so every server behavior is testable without a socket. The raw
//! [`RequestHandler::handle_post`] dispatcher serves the same purpose for
//! in-process loopback transports.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::store::{ProgressionPoint, RemoteStore, StoredEntry};
use chrono::Utc;
use liftlog_core::RecordId;
use liftlog_sync_protocol::{
    SubmitRequest, SubmitResponse, SyncBatchRequest, SyncBatchResponse,
};
use std::sync::Arc;

/// Dispatches decoded requests to the store.
pub struct RequestHandler {
    store: Arc<RemoteStore>,
    config: ServerConfig,
}

impl RequestHandler {
    /// Creates a handler over the given store.
    pub fn new(store: Arc<RemoteStore>, config: ServerConfig) -> Self {
        Self { store, config }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<RemoteStore> {
        &self.store
    }

    /// Accepts a sync batch from a client's offline storage.
    ///
    /// The whole batch is merged atomically; the response is a binary
    /// acknowledgment with a count. Oversized batches are rejected before
    /// touching the store.
    pub fn handle_sync(&self, request: SyncBatchRequest) -> ServerResult<SyncBatchResponse> {
        if request.entries.len() > self.config.max_batch_size {
            return Err(ServerError::BatchTooLarge {
                size: request.entries.len(),
                max: self.config.max_batch_size,
            });
        }
        let synced = self.store.upsert_batch(request.entries, Utc::now())?;
        tracing::info!(synced, "accepted sync batch");
        Ok(SyncBatchResponse::success(synced))
    }

    /// Accepts a single direct submission.
    pub fn handle_submit(&self, request: SubmitRequest) -> ServerResult<SubmitResponse> {
        let now = Utc::now();
        let entry = request.resolve(now)?;
        tracing::debug!(name = %entry.name, "accepted submission");
        self.store.upsert_single(entry, now)?;
        Ok(SubmitResponse::success())
    }

    /// Lists entries newest-first, optionally filtered and paged.
    #[must_use]
    pub fn handle_list(
        &self,
        name: Option<&str>,
        limit: Option<usize>,
        offset: usize,
    ) -> Vec<StoredEntry> {
        self.store.list(name, limit, offset)
    }

    /// Distinct exercise names, most-used first.
    #[must_use]
    pub fn handle_names(&self) -> Vec<String> {
        self.store.names()
    }

    /// Chronological series for one exercise.
    #[must_use]
    pub fn handle_progression(&self, name: &str) -> Vec<ProgressionPoint> {
        self.store.progression(name)
    }

    /// Deletes an entry by id.
    pub fn handle_delete(&self, id: RecordId) -> ServerResult<()> {
        self.store.delete(id)
    }

    /// Raw JSON dispatcher for in-process transports.
    ///
    /// Routes by path the way the HTTP layer does, but over bytes. Used by
    /// loopback clients in tests and embedded setups.
    pub fn handle_post(&self, path: &str, body: &[u8]) -> ServerResult<Vec<u8>> {
        match path {
            "/api/sync" => {
                let request = SyncBatchRequest::decode(body)
                    .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
                let response = self.handle_sync(request)?;
                Ok(response.encode().map_err(ServerError::from)?)
            }
            "/api/exercises" => {
                let request: SubmitRequest = serde_json::from_slice(body)
                    .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
                let response = self.handle_submit(request)?;
                Ok(serde_json::to_vec(&response)?)
            }
            other => Err(ServerError::InvalidRequest(format!(
                "unknown path: {other}"
            ))),
        }
    }
}
