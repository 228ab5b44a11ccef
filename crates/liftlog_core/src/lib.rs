//! # Liftlog Core
//!
//! Record model and offline-first local store for liftlog.
//!
//! This crate provides:
//! - The [`Record`] value type (one logged exercise entry)
//! - [`LogStore`], a durable keyed store with name, recency, and
//!   sync-flag query paths
//! - [`ProgressionStats`] derived from a chronological series
//!
//! ## Key Invariants
//!
//! - A write with an existing id **replaces** the prior record (upsert,
//!   never append) - this is the idempotency anchor sync depends on
//! - `created_at` is assigned exactly once, at first creation
//! - `synced` transitions only false→true, driven by remote acknowledgment
//! - Deletion is unconditional and local-only (no tombstones)

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod record;
mod stats;
mod store;

pub use error::{CoreError, CoreResult};
pub use record::{normalize_name, Record, RecordDraft, RecordId, WeightUnit};
pub use stats::ProgressionStats;
pub use store::LogStore;
