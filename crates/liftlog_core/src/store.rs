//! The durable local record store.

use crate::error::{CoreError, CoreResult};
use crate::record::{normalize_name, Record, RecordDraft, RecordId};
use liftlog_storage::SnapshotBackend;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Durable, queryable keyed storage for [`Record`]s.
///
/// The store is constructed once at startup over an explicitly owned
/// [`SnapshotBackend`] and passed by handle to dependent components; there
/// is no hidden global connection.
///
/// Every mutation serializes the full record set and persists it through
/// the backend **before** becoming visible to readers, so a successful
/// `put` is durable and immediately visible to subsequent reads. None of
/// the operations require network access.
pub struct LogStore {
    backend: Box<dyn SnapshotBackend>,
    records: RwLock<HashMap<RecordId, Record>>,
}

impl LogStore {
    /// Opens a store over the given backend, loading any existing snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the snapshot cannot be read and
    /// [`CoreError::Corrupted`] if it cannot be decoded.
    pub fn open(backend: Box<dyn SnapshotBackend>) -> CoreResult<Self> {
        let records = match backend.load()? {
            Some(bytes) => {
                let list: Vec<Record> = serde_json::from_slice(&bytes)
                    .map_err(|e| CoreError::corrupted(e.to_string()))?;
                list.into_iter().map(|r| (r.id, r)).collect()
            }
            None => HashMap::new(),
        };

        Ok(Self {
            backend,
            records: RwLock::new(records),
        })
    }

    /// Normalizes and stores a record, upserting by id.
    ///
    /// Fills defaults for absent fields (fresh id, current time, canonical
    /// unit, `synced = false`) and **replaces** any record with the same
    /// id. Returns the normalized stored record.
    ///
    /// Missing name/weight validation is deliberately not performed here;
    /// that is the submission boundary's job.
    pub fn put(&self, draft: RecordDraft) -> CoreResult<Record> {
        let record = draft.into_record();
        let stored = record.clone();

        self.commit(move |records| {
            records.insert(record.id, record);
        })?;

        tracing::debug!(id = %stored.id, name = %stored.name, "record stored");
        Ok(stored)
    }

    /// Returns the record with the given id, if present.
    pub fn get(&self, id: RecordId) -> Option<Record> {
        self.records.read().get(&id).cloned()
    }

    /// Returns every record, most recent first.
    ///
    /// Ordering is by `created_at` descending with a deterministic id
    /// tie-break for equal timestamps.
    pub fn get_all(&self) -> Vec<Record> {
        let mut all: Vec<Record> = self.records.read().values().cloned().collect();
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        all
    }

    /// Returns records matching the name, oldest first.
    ///
    /// Matching is a case-insensitive exact match on the normalized name.
    /// The ascending order is deliberately opposite to [`Self::get_all`]:
    /// it feeds chronological chart rendering.
    pub fn get_by_name(&self, name: &str) -> Vec<Record> {
        let needle = normalize_name(name);
        let mut matches: Vec<Record> = self
            .records
            .read()
            .values()
            .filter(|r| r.name == needle)
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        matches
    }

    /// Returns the most recent record for the name, if any.
    pub fn get_last_by_name(&self, name: &str) -> Option<Record> {
        self.get_by_name(name).into_iter().last()
    }

    /// Returns distinct normalized names, most-logged first.
    ///
    /// Ties are broken lexicographically so the order is deterministic.
    pub fn names(&self) -> Vec<String> {
        let records = self.records.read();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in records.values() {
            *counts.entry(record.name.as_str()).or_default() += 1;
        }

        let mut names: Vec<(&str, usize)> = counts.into_iter().collect();
        names.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        names.into_iter().map(|(name, _)| name.to_string()).collect()
    }

    /// Returns all records not yet acknowledged by the remote authority.
    ///
    /// No ordering is guaranteed.
    pub fn unsynced(&self) -> Vec<Record> {
        self.records
            .read()
            .values()
            .filter(|r| !r.synced)
            .cloned()
            .collect()
    }

    /// Marks the given ids as synced and persists the change.
    ///
    /// Ids not present in the store are silently ignored: a record may
    /// have been deleted locally between being read for sync and being
    /// acknowledged. Returns the number of records actually marked.
    pub fn mark_synced(&self, ids: &[RecordId]) -> CoreResult<usize> {
        let mut marked = 0;
        self.commit(|records| {
            for id in ids {
                if let Some(record) = records.get_mut(id) {
                    if !record.synced {
                        record.synced = true;
                        marked += 1;
                    }
                }
            }
        })?;

        tracing::debug!(marked, "records marked synced");
        Ok(marked)
    }

    /// Removes a record unconditionally.
    ///
    /// Removing an unknown id is not an error. Deletion is local-only;
    /// no tombstone is produced.
    pub fn remove(&self, id: RecordId) -> CoreResult<()> {
        self.commit(|records| {
            records.remove(&id);
        })?;

        tracing::debug!(%id, "record removed");
        Ok(())
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Applies a mutation, persisting the result before it becomes visible.
    ///
    /// The snapshot is written from the mutated copy; only when the backend
    /// accepts it does the in-memory state switch over. A storage failure
    /// therefore leaves both the snapshot and readers on the previous state.
    fn commit<F>(&self, mutate: F) -> CoreResult<()>
    where
        F: FnOnce(&mut HashMap<RecordId, Record>),
    {
        let mut records = self.records.write();
        let mut next = records.clone();
        mutate(&mut next);
        self.persist(&next)?;
        *records = next;
        Ok(())
    }

    fn persist(&self, records: &HashMap<RecordId, Record>) -> CoreResult<()> {
        let mut list: Vec<&Record> = records.values().collect();
        // Deterministic snapshot order, oldest first.
        list.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let bytes = serde_json::to_vec_pretty(&list)?;
        self.backend.persist(&bytes)?;
        Ok(())
    }
}

impl std::fmt::Debug for LogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStore")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
