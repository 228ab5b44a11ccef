//! Protocol messages for batch sync and direct submission.

use crate::entry::EntryPayload;
use crate::error::{ProtocolError, ProtocolResult};
use chrono::{DateTime, Utc};
use liftlog_core::{normalize_name, RecordId, WeightUnit};
use serde::{Deserialize, Serialize};

/// Batch of offline-originated entries, shipped in one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncBatchRequest {
    /// The full unsynced set, in no particular order.
    pub entries: Vec<EntryPayload>,
}

impl SyncBatchRequest {
    /// Creates a batch request.
    #[must_use]
    pub fn new(entries: Vec<EntryPayload>) -> Self {
        Self { entries }
    }

    /// Encodes to JSON bytes.
    pub fn encode(&self) -> ProtocolResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes from JSON bytes.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Whole-batch acknowledgment from the remote authority.
///
/// The ack is binary: either the entire batch was merged (with a count)
/// or nothing was. There is no per-entry outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncBatchResponse {
    /// Whether the batch was accepted.
    pub success: bool,
    /// Number of entries merged.
    pub synced: u64,
    /// Error message when rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncBatchResponse {
    /// Creates a successful acknowledgment.
    #[must_use]
    pub fn success(synced: u64) -> Self {
        Self {
            success: true,
            synced,
            error: None,
        }
    }

    /// Creates a rejection.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            synced: 0,
            error: Some(message.into()),
        }
    }

    /// Encodes to JSON bytes.
    pub fn encode(&self) -> ProtocolResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes from JSON bytes.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// A single direct (non-offline-originated) submission.
///
/// Only `name` and `weight` are required; everything else defaults on the
/// server side. Validation happens in [`SubmitRequest::resolve`], never by
/// silent defaulting of the required fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Identity; the server generates one when absent.
    #[serde(default)]
    pub id: Option<RecordId>,
    /// Exercise name (required).
    #[serde(default)]
    pub name: Option<String>,
    /// Weight moved (required).
    #[serde(default)]
    pub weight: Option<f64>,
    /// Repetitions per set.
    #[serde(default)]
    pub reps: Option<u32>,
    /// Number of sets.
    #[serde(default)]
    pub sets: Option<u32>,
    /// Weight unit; defaults to kilograms.
    #[serde(default)]
    pub unit: Option<WeightUnit>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Event time; defaults to the submission time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SubmitRequest {
    /// Validates the request and resolves defaults into a full entry.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MissingField`] when `name` or `weight` is
    /// absent.
    pub fn resolve(self, now: DateTime<Utc>) -> ProtocolResult<EntryPayload> {
        let name = self
            .name
            .as_deref()
            .map(normalize_name)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ProtocolError::missing_field("name"))?;
        let weight = self
            .weight
            .ok_or_else(|| ProtocolError::missing_field("weight"))?;

        Ok(EntryPayload {
            id: self.id.unwrap_or_default(),
            name,
            weight,
            reps: self.reps,
            sets: self.sets,
            unit: self.unit.unwrap_or_default(),
            notes: self.notes,
            created_at: self.created_at.unwrap_or(now),
        })
    }
}

/// Acknowledgment of a direct submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Whether the entry was merged.
    pub success: bool,
}

impl SubmitResponse {
    /// Creates a successful acknowledgment.
    #[must_use]
    pub fn success() -> Self {
        Self { success: true }
    }
}
