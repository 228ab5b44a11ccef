//! The server-side entry store.
//!
//! Same shape as the client's log store: a full in-memory map over a
//! snapshot backend, persisted before any mutation becomes visible. The
//! server's copy differs in what it remembers (a `synced_at` receipt
//! instead of a `synced` flag) and in the merge rule: entries upsert by
//! id, so re-delivered batches are absorbed without duplicates.

use crate::error::{ServerError, ServerResult};
use chrono::{DateTime, Utc};
use liftlog_core::{normalize_name, RecordId, WeightUnit};
use liftlog_storage::SnapshotBackend;
use liftlog_sync_protocol::EntryPayload;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One accepted entry, as the server remembers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    /// The entry as received.
    #[serde(flatten)]
    pub entry: EntryPayload,
    /// When this server first accepted the entry.
    pub synced_at: DateTime<Utc>,
}

/// One point in a progression series for a single exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionPoint {
    /// Weight moved.
    pub weight: f64,
    /// Repetitions per set, if recorded.
    pub reps: Option<u32>,
    /// Number of sets, if recorded.
    pub sets: Option<u32>,
    /// Weight unit.
    pub unit: WeightUnit,
    /// When the set was performed.
    pub created_at: DateTime<Utc>,
}

impl From<&StoredEntry> for ProgressionPoint {
    fn from(stored: &StoredEntry) -> Self {
        Self {
            weight: stored.entry.weight,
            reps: stored.entry.reps,
            sets: stored.entry.sets,
            unit: stored.entry.unit,
            created_at: stored.entry.created_at,
        }
    }
}

/// Durable store of accepted entries, keyed by record id.
pub struct RemoteStore {
    backend: Box<dyn SnapshotBackend>,
    entries: RwLock<HashMap<RecordId, StoredEntry>>,
}

impl RemoteStore {
    /// Opens the store, loading any existing snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Corrupted`] when a snapshot exists but does
    /// not decode.
    pub fn open(backend: Box<dyn SnapshotBackend>) -> ServerResult<Self> {
        let entries = match backend.load()? {
            Some(bytes) => {
                let list: Vec<StoredEntry> = serde_json::from_slice(&bytes)
                    .map_err(|e| ServerError::corrupted(e.to_string()))?;
                list.into_iter().map(|s| (s.entry.id, s)).collect()
            }
            None => HashMap::new(),
        };
        Ok(Self {
            backend,
            entries: RwLock::new(entries),
        })
    }

    /// Merges a batch of entries, upserting each by id.
    ///
    /// All-or-nothing: either the whole batch is persisted and the merged
    /// count returned, or the store is unchanged. Entries already present
    /// are overwritten in place and keep their original `synced_at`.
    pub fn upsert_batch(&self, batch: Vec<EntryPayload>, now: DateTime<Utc>) -> ServerResult<u64> {
        if batch.is_empty() {
            return Ok(0);
        }
        let count = batch.len() as u64;
        self.commit(|entries| {
            for payload in batch {
                let synced_at = entries
                    .get(&payload.id)
                    .map_or(now, |existing| existing.synced_at);
                entries.insert(
                    payload.id,
                    StoredEntry {
                        entry: payload,
                        synced_at,
                    },
                );
            }
        })?;
        Ok(count)
    }

    /// Merges a single entry by id.
    pub fn upsert_single(&self, entry: EntryPayload, now: DateTime<Utc>) -> ServerResult<()> {
        self.upsert_batch(vec![entry], now)?;
        Ok(())
    }

    /// Returns entries newest-first, optionally filtered by exercise name
    /// and paged.
    #[must_use]
    pub fn list(&self, name: Option<&str>, limit: Option<usize>, offset: usize) -> Vec<StoredEntry> {
        let wanted = name.map(normalize_name);
        let entries = self.entries.read();
        let mut out: Vec<StoredEntry> = entries
            .values()
            .filter(|s| wanted.as_deref().is_none_or(|w| s.entry.name == w))
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            b.entry
                .created_at
                .cmp(&a.entry.created_at)
                .then_with(|| a.entry.id.cmp(&b.entry.id))
        });
        out.into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }

    /// Returns distinct exercise names, most-used first, then lexicographic.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let entries = self.entries.read();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for stored in entries.values() {
            *counts.entry(stored.entry.name.as_str()).or_default() += 1;
        }
        let mut names: Vec<(&str, usize)> = counts.into_iter().collect();
        names.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        names.into_iter().map(|(n, _)| n.to_string()).collect()
    }

    /// Returns the chronological series for one exercise, oldest-first.
    #[must_use]
    pub fn progression(&self, name: &str) -> Vec<ProgressionPoint> {
        let wanted = normalize_name(name);
        let entries = self.entries.read();
        let mut matched: Vec<&StoredEntry> = entries
            .values()
            .filter(|s| s.entry.name == wanted)
            .collect();
        matched.sort_by(|a, b| {
            a.entry
                .created_at
                .cmp(&b.entry.created_at)
                .then_with(|| a.entry.id.cmp(&b.entry.id))
        });
        matched.into_iter().map(ProgressionPoint::from).collect()
    }

    /// Deletes an entry by id. Deleting an unknown id is a no-op.
    pub fn delete(&self, id: RecordId) -> ServerResult<()> {
        if !self.entries.read().contains_key(&id) {
            return Ok(());
        }
        self.commit(|entries| {
            entries.remove(&id);
        })
    }

    /// Number of entries in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Applies a mutation to a working copy, persists it, and only then
    /// makes it visible. A failed persist leaves the in-memory state
    /// untouched.
    fn commit(&self, mutate: impl FnOnce(&mut HashMap<RecordId, StoredEntry>)) -> ServerResult<()> {
        let mut guard = self.entries.write();
        let mut working = guard.clone();
        mutate(&mut working);

        let mut list: Vec<&StoredEntry> = working.values().collect();
        list.sort_by(|a, b| {
            a.entry
                .created_at
                .cmp(&b.entry.created_at)
                .then_with(|| a.entry.id.cmp(&b.entry.id))
        });
        let bytes = serde_json::to_vec_pretty(&list)?;
        self.backend.persist(&bytes)?;

        *guard = working;
        Ok(())
    }
}

impl std::fmt::Debug for RemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStore")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftlog_core::RecordDraft;
    use liftlog_storage::{FileBackend, InMemoryBackend, StorageError, StorageResult};

    fn open_memory() -> RemoteStore {
        RemoteStore::open(Box::new(InMemoryBackend::new())).unwrap()
    }

    fn payload(name: &str, weight: f64) -> EntryPayload {
        EntryPayload::from(RecordDraft::new(name, weight).into_record())
    }

    #[test]
    fn upsert_batch_counts_and_stores() {
        let store = open_memory();
        let n = store
            .upsert_batch(vec![payload("squat", 100.0), payload("bench", 80.0)], Utc::now())
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn redelivery_merges_without_duplicates() {
        let store = open_memory();
        let entry = payload("squat", 100.0);

        let first_now = Utc::now();
        store.upsert_batch(vec![entry.clone()], first_now).unwrap();
        store
            .upsert_batch(vec![entry.clone()], first_now + chrono::Duration::hours(1))
            .unwrap();

        assert_eq!(store.len(), 1);
        // The receipt time of the first acceptance survives redelivery.
        let listed = store.list(None, None, 0);
        assert_eq!(listed[0].synced_at, first_now);
    }

    #[test]
    fn redelivery_overwrites_fields() {
        let store = open_memory();
        let mut entry = payload("squat", 100.0);
        store.upsert_batch(vec![entry.clone()], Utc::now()).unwrap();

        entry.weight = 105.0;
        store.upsert_batch(vec![entry.clone()], Utc::now()).unwrap();

        let listed = store.list(None, None, 0);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].entry.weight, 105.0);
    }

    #[test]
    fn empty_batch_is_zero() {
        let store = open_memory();
        assert_eq!(store.upsert_batch(vec![], Utc::now()).unwrap(), 0);
    }

    #[test]
    fn list_is_newest_first_with_name_filter_and_paging() {
        let store = open_memory();
        let base = Utc::now();
        for (i, name) in ["squat", "bench", "squat", "squat"].iter().enumerate() {
            let mut entry = payload(name, 100.0 + i as f64);
            entry.created_at = base + chrono::Duration::minutes(i as i64);
            store.upsert_single(entry, base).unwrap();
        }

        let all = store.list(None, None, 0);
        assert_eq!(all.len(), 4);
        assert!(all.windows(2).all(|w| w[0].entry.created_at >= w[1].entry.created_at));

        let squats = store.list(Some("Squat"), None, 0);
        assert_eq!(squats.len(), 3);
        assert_eq!(squats[0].entry.weight, 103.0);

        let page = store.list(Some("squat"), Some(1), 1);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].entry.weight, 102.0);
    }

    #[test]
    fn names_ranked_by_frequency() {
        let store = open_memory();
        let now = Utc::now();
        for name in ["bench", "squat", "squat", "deadlift"] {
            store.upsert_single(payload(name, 100.0), now).unwrap();
        }
        assert_eq!(store.names(), vec!["squat", "bench", "deadlift"]);
    }

    #[test]
    fn progression_is_chronological() {
        let store = open_memory();
        let base = Utc::now();
        for (i, weight) in [100.0, 102.5, 105.0].iter().enumerate() {
            let mut entry = payload("squat", *weight);
            // Insert out of order; the series must still come back sorted.
            entry.created_at = base + chrono::Duration::days(2 - i as i64);
            store.upsert_single(entry, base).unwrap();
        }
        store.upsert_single(payload("bench", 80.0), base).unwrap();

        let series = store.progression("squat");
        assert_eq!(series.len(), 3);
        assert_eq!(
            series.iter().map(|p| p.weight).collect::<Vec<_>>(),
            vec![105.0, 102.5, 100.0]
        );
        assert!(series.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[test]
    fn delete_removes_and_unknown_is_noop() {
        let store = open_memory();
        let entry = payload("squat", 100.0);
        let id = entry.id;
        store.upsert_single(entry, Utc::now()).unwrap();

        store.delete(id).unwrap();
        assert!(store.is_empty());
        store.delete(id).unwrap();
    }

    #[test]
    fn snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exercises.json");

        {
            let backend = FileBackend::open(&path).unwrap();
            let store = RemoteStore::open(Box::new(backend)).unwrap();
            store
                .upsert_batch(vec![payload("squat", 100.0), payload("bench", 80.0)], Utc::now())
                .unwrap();
        }

        let backend = FileBackend::open(&path).unwrap();
        let reopened = RemoteStore::open(Box::new(backend)).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.names().len(), 2);
    }

    #[test]
    fn corrupt_snapshot_is_reported() {
        let backend = InMemoryBackend::with_snapshot(b"not json".to_vec());
        let err = RemoteStore::open(Box::new(backend)).unwrap_err();
        assert!(matches!(err, ServerError::Corrupted { .. }));
    }

    struct FailingBackend;

    impl SnapshotBackend for FailingBackend {
        fn load(&self) -> StorageResult<Option<Vec<u8>>> {
            Ok(None)
        }

        fn persist(&self, _data: &[u8]) -> StorageResult<()> {
            Err(StorageError::Unavailable("disk full".to_string()))
        }
    }

    #[test]
    fn failed_persist_leaves_store_unchanged() {
        let store = RemoteStore::open(Box::new(FailingBackend)).unwrap();
        let err = store
            .upsert_batch(vec![payload("squat", 100.0)], Utc::now())
            .unwrap_err();
        assert!(matches!(err, ServerError::Storage(_)));
        assert!(store.is_empty());
    }
}
