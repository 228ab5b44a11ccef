//! The sync engine.

use crate::config::SyncConfig;
use crate::connectivity::ConnectivityProbe;
use crate::error::SyncResult;
use crate::transport::SyncTransport;
use liftlog_core::{LogStore, RecordId};
use liftlog_sync_protocol::{EntryPayload, SyncBatchRequest};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Statistics about sync attempts.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Total number of `attempt_sync` invocations.
    pub attempts: u64,
    /// Number of batches acknowledged by the remote authority.
    pub batches_pushed: u64,
    /// Total records marked synced.
    pub records_synced: u64,
    /// Last transport or server error message.
    pub last_error: Option<String>,
    /// Time of the last acknowledged batch.
    pub last_success: Option<Instant>,
}

/// Result of one sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Number of records acknowledged and marked synced by this attempt.
    pub synced: u64,
}

impl SyncOutcome {
    /// An attempt that moved nothing (offline, empty set, or failure).
    #[must_use]
    pub const fn none() -> Self {
        Self { synced: 0 }
    }
}

/// Drops back to "not in flight" when the attempt finishes.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Drives the local-to-remote reconciliation protocol.
///
/// The engine is stateless beyond its single in-flight attempt: every
/// invocation reads the full unsynced set from the store, ships it as one
/// batch, and on whole-batch acknowledgment marks exactly those ids
/// synced. Retry is re-invocation - the periodic scheduler and the
/// connectivity trigger both call [`SyncEngine::attempt_sync`], and both
/// are safe to overlap because the remote merge is upsert-by-id.
pub struct SyncEngine<T: SyncTransport, P: ConnectivityProbe> {
    config: SyncConfig,
    store: Arc<LogStore>,
    transport: T,
    probe: P,
    stats: RwLock<SyncStats>,
    in_flight: AtomicBool,
}

impl<T: SyncTransport, P: ConnectivityProbe> SyncEngine<T, P> {
    /// Creates a new sync engine over the given store.
    pub fn new(config: SyncConfig, store: Arc<LogStore>, transport: T, probe: P) -> Self {
        Self {
            config,
            store,
            transport,
            probe,
            stats: RwLock::new(SyncStats::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns a snapshot of the sync statistics.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Returns whether the connectivity probe currently reports online.
    pub fn is_online(&self) -> bool {
        self.probe.is_online()
    }

    /// Attempts to reconcile the local store with the remote authority.
    ///
    /// The protocol:
    /// 1. Offline: no network action, zero-synced outcome.
    /// 2. Empty unsynced set: zero-synced outcome.
    /// 3. Ship the entire unsynced set as one batch.
    /// 4. On acknowledgment, mark every submitted id synced.
    /// 5. On any transport failure or rejection, mark nothing; the batch
    ///    stays unsynced for the next attempt. The failure is logged and
    ///    swallowed so callers are never interrupted by a connectivity
    ///    blip.
    ///
    /// # Errors
    ///
    /// Only local store failures (reading or marking) propagate.
    pub fn attempt_sync(&self) -> SyncResult<SyncOutcome> {
        self.stats.write().attempts += 1;

        if !self.probe.is_online() {
            tracing::trace!("offline, skipping sync attempt");
            return Ok(SyncOutcome::none());
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!("sync already in flight, skipping redundant attempt");
            return Ok(SyncOutcome::none());
        };

        let unsynced = self.store.unsynced();
        if unsynced.is_empty() {
            tracing::trace!("nothing to sync");
            return Ok(SyncOutcome::none());
        }

        let ids: Vec<RecordId> = unsynced.iter().map(|r| r.id).collect();
        let entries: Vec<EntryPayload> = unsynced.into_iter().map(EntryPayload::from).collect();
        let batch = SyncBatchRequest::new(entries);

        match self.transport.push_batch(&batch) {
            Ok(response) if response.success => {
                self.store.mark_synced(&ids)?;

                let count = ids.len() as u64;
                let mut stats = self.stats.write();
                stats.batches_pushed += 1;
                stats.records_synced += count;
                stats.last_success = Some(Instant::now());
                stats.last_error = None;

                tracing::info!(synced = count, "batch acknowledged");
                Ok(SyncOutcome { synced: count })
            }
            Ok(response) => {
                let message = response
                    .error
                    .unwrap_or_else(|| "batch rejected".to_string());
                tracing::warn!(error = %message, "sync rejected, will retry later");
                self.stats.write().last_error = Some(message);
                Ok(SyncOutcome::none())
            }
            Err(e) => {
                tracing::warn!(error = %e, "sync failed, will retry later");
                self.stats.write().last_error = Some(e.to_string());
                Ok(SyncOutcome::none())
            }
        }
    }
}
