//! The record value type and its identifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a record.
///
/// Record IDs are 128-bit UUIDs that are:
/// - Generated client-side at creation time if absent
/// - Globally unique
/// - Never reassigned; they serve as the merge key on both sides of sync
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Creates a new random record ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a record ID from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Converts to a UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl From<Uuid> for RecordId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Weight unit of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    /// Kilograms (the canonical default).
    #[default]
    Kg,
    /// Pounds.
    Lb,
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightUnit::Kg => write!(f, "kg"),
            WeightUnit::Lb => write!(f, "lb"),
        }
    }
}

impl FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kgs" => Ok(WeightUnit::Kg),
            "lb" | "lbs" => Ok(WeightUnit::Lb),
            other => Err(format!("unknown weight unit: {other}")),
        }
    }
}

/// Normalizes an exercise name to its canonical stored form.
///
/// Names are trimmed and lowercased before storage so that identity and
/// grouping are case-insensitive.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One logged exercise entry.
///
/// This is the unit of storage and sync. `synced` is local-only and never
/// crosses the wire; the remote authority stamps its own receipt time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identity; the upsert key everywhere.
    pub id: RecordId,
    /// Normalized (trimmed, lowercased) exercise name.
    pub name: String,
    /// Weight moved, in `unit`.
    pub weight: f64,
    /// Number of sets; `None` means "not recorded", distinct from zero.
    pub sets: Option<u32>,
    /// Repetitions per set; `None` means "not recorded".
    pub reps: Option<u32>,
    /// Weight unit.
    pub unit: WeightUnit,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the set was performed. Assigned once, immutable afterward.
    pub created_at: DateTime<Utc>,
    /// True once the remote authority has acknowledged this record.
    pub synced: bool,
}

/// Input for creating or replacing a record.
///
/// Absent fields are defaulted by [`crate::LogStore::put`]: a fresh id, the
/// current time, the canonical unit, and `synced = false`.
#[derive(Debug, Clone, Default)]
pub struct RecordDraft {
    /// Existing identity; a fresh one is generated when absent.
    pub id: Option<RecordId>,
    /// Exercise name (normalized on put).
    pub name: String,
    /// Weight moved.
    pub weight: f64,
    /// Number of sets.
    pub sets: Option<u32>,
    /// Repetitions per set.
    pub reps: Option<u32>,
    /// Weight unit; defaults to kilograms.
    pub unit: Option<WeightUnit>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Event time; defaults to now.
    pub created_at: Option<DateTime<Utc>>,
    /// Sync flag carried through for re-inserts; defaults to false.
    pub synced: bool,
}

impl RecordDraft {
    /// Creates a draft with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            ..Self::default()
        }
    }

    /// Sets the identity (turns the put into a replace).
    #[must_use]
    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the number of sets.
    #[must_use]
    pub fn with_sets(mut self, sets: u32) -> Self {
        self.sets = Some(sets);
        self
    }

    /// Sets the repetitions per set.
    #[must_use]
    pub fn with_reps(mut self, reps: u32) -> Self {
        self.reps = Some(reps);
        self
    }

    /// Sets the weight unit.
    #[must_use]
    pub fn with_unit(mut self, unit: WeightUnit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Sets the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Sets the event time.
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Resolves the draft into a full record, filling defaults.
    ///
    /// [`crate::LogStore::put`] goes through this; resolving outside the
    /// store does not persist anything.
    #[must_use]
    pub fn into_record(self) -> Record {
        Record {
            id: self.id.unwrap_or_default(),
            name: normalize_name(&self.name),
            weight: self.weight,
            sets: self.sets,
            reps: self.reps,
            unit: self.unit.unwrap_or_default(),
            notes: self.notes,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            synced: self.synced,
        }
    }
}

impl From<Record> for RecordDraft {
    fn from(record: Record) -> Self {
        Self {
            id: Some(record.id),
            name: record.name,
            weight: record.weight,
            sets: record.sets,
            reps: record.reps,
            unit: Some(record.unit),
            notes: record.notes,
            created_at: Some(record.created_at),
            synced: record.synced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_unique() {
        assert_ne!(RecordId::new(), RecordId::new());
    }

    #[test]
    fn record_id_parse_roundtrip() {
        let id = RecordId::new();
        let parsed: RecordId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn unit_parse() {
        assert_eq!("kg".parse::<WeightUnit>().unwrap(), WeightUnit::Kg);
        assert_eq!("LBS".parse::<WeightUnit>().unwrap(), WeightUnit::Lb);
        assert!("stone".parse::<WeightUnit>().is_err());
    }

    #[test]
    fn unit_serde_form() {
        assert_eq!(serde_json::to_string(&WeightUnit::Kg).unwrap(), "\"kg\"");
        assert_eq!(
            serde_json::from_str::<WeightUnit>("\"lb\"").unwrap(),
            WeightUnit::Lb
        );
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize_name("  Bench Press "), "bench press");
        assert_eq!(normalize_name("SQUAT"), "squat");
    }

    #[test]
    fn draft_defaults() {
        let record = RecordDraft::new(" Deadlift ", 120.0).into_record();
        assert_eq!(record.name, "deadlift");
        assert_eq!(record.unit, WeightUnit::Kg);
        assert_eq!(record.sets, None);
        assert_eq!(record.reps, None);
        assert!(!record.synced);
    }

    #[test]
    fn draft_zero_sets_is_not_absent() {
        let record = RecordDraft::new("squat", 100.0).with_sets(0).into_record();
        assert_eq!(record.sets, Some(0));
    }

    #[test]
    fn draft_keeps_explicit_identity_and_time() {
        let id = RecordId::new();
        let at = Utc::now();
        let record = RecordDraft::new("squat", 100.0)
            .with_id(id)
            .with_created_at(at)
            .into_record();
        assert_eq!(record.id, id);
        assert_eq!(record.created_at, at);
    }
}
