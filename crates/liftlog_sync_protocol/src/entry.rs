//! The wire form of a record.

use chrono::{DateTime, Utc};
use liftlog_core::{Record, RecordDraft, RecordId, WeightUnit};
use serde::{Deserialize, Serialize};

/// One entry as it travels between client and server.
///
/// This is a [`Record`] minus the local-only `synced` flag. Identity and
/// `created_at` always cross the wire so the server's upsert-by-id merge
/// is idempotent and never re-stamps the event time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPayload {
    /// Record identity; the merge key on both sides.
    pub id: RecordId,
    /// Normalized exercise name.
    pub name: String,
    /// Weight moved.
    pub weight: f64,
    /// Repetitions per set, if recorded.
    pub reps: Option<u32>,
    /// Number of sets, if recorded.
    pub sets: Option<u32>,
    /// Weight unit.
    pub unit: WeightUnit,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the set was performed (client-assigned, immutable).
    pub created_at: DateTime<Utc>,
}

impl From<Record> for EntryPayload {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            name: record.name,
            weight: record.weight,
            reps: record.reps,
            sets: record.sets,
            unit: record.unit,
            notes: record.notes,
            created_at: record.created_at,
        }
    }
}

impl EntryPayload {
    /// Converts back into a local store draft.
    ///
    /// The draft carries `synced = false`; a record arriving from the wire
    /// has not been acknowledged *by* this side.
    #[must_use]
    pub fn into_draft(self) -> RecordDraft {
        RecordDraft {
            id: Some(self.id),
            name: self.name,
            weight: self.weight,
            sets: self.sets,
            reps: self.reps,
            unit: Some(self.unit),
            notes: self.notes,
            created_at: Some(self.created_at),
            synced: false,
        }
    }
}
