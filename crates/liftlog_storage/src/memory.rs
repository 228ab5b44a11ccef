//! In-memory snapshot backend for testing.

use crate::backend::SnapshotBackend;
use crate::error::StorageResult;
use parking_lot::RwLock;

/// An in-memory snapshot backend.
///
/// Data does not survive the process; intended for tests and ephemeral
/// stores.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: RwLock<Option<Vec<u8>>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-seeded with a snapshot.
    #[must_use]
    pub fn with_snapshot(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(Some(data)),
        }
    }
}

impl SnapshotBackend for InMemoryBackend {
    fn load(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data.read().clone())
    }

    fn persist(&self, data: &[u8]) -> StorageResult<()> {
        *self.data.write() = Some(data.to_vec());
        Ok(())
    }
}
