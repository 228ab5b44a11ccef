//! Snapshot backend trait definition.

use crate::error::StorageResult;

/// A low-level snapshot store for liftlog.
///
/// Backends hold exactly one opaque byte blob. Record stores serialize
/// their full state and replace the blob on every mutation; backends do
/// not understand records, names, or sync flags.
///
/// # Invariants
///
/// - `load` returns exactly the bytes most recently persisted, or `None`
///   if nothing was ever persisted
/// - `persist` replaces the previous snapshot atomically: a crash during
///   `persist` leaves either the old or the new snapshot, never a mix
/// - After `persist` returns, the snapshot survives process termination
///   (for durable backends)
/// - Backends must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait SnapshotBackend: Send + Sync {
    /// Reads the current snapshot.
    ///
    /// Returns `None` if no snapshot has ever been persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn load(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the snapshot with `data`.
    ///
    /// After this returns successfully, a subsequent `load` observes
    /// exactly `data`, even across a process restart.
    ///
    /// # Errors
    ///
    /// Returns an error if the write or replacement fails.
    fn persist(&self, data: &[u8]) -> StorageResult<()>;
}
