//! # Liftlog Sync Engine
//!
//! Moves unsynced records from the local store to the remote authority.
//!
//! This crate provides:
//! - Connectivity probing (offline attempts are silent no-ops)
//! - Transport abstraction (mock, HTTP client abstraction, loopback)
//! - The sync engine itself (whole-batch push, all-or-nothing marking)
//! - A periodic scheduler with an online-transition trigger
//!
//! ## Key Invariants
//!
//! - Offline means zero network calls and a zero-synced report, not an error
//! - A batch is marked synced only after the whole batch is acknowledged;
//!   a failed push marks nothing and the batch is retried on the next attempt
//! - Transport failures are logged and swallowed; storage failures propagate
//! - Re-submission is harmless: the remote merge is upsert-by-id, so the
//!   engine is naturally idempotent across overlapping or repeated attempts

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod connectivity;
mod engine;
mod error;
mod http;
mod scheduler;
mod transport;

pub use config::SyncConfig;
pub use connectivity::{AlwaysOnline, ConnectivityProbe, ManualProbe};
pub use engine::{SyncEngine, SyncOutcome, SyncStats};
pub use error::{SyncError, SyncResult};
pub use http::{HttpClient, HttpTransport, LoopbackClient, LoopbackServer};
pub use scheduler::SyncScheduler;
pub use transport::{MockTransport, SyncTransport};
