//! # Liftlog Sync Protocol
//!
//! Wire types shared by the sync engine and the remote authority.
//!
//! The protocol is JSON over HTTP:
//! - `POST /api/sync` - batch accept of offline-originated entries
//! - `POST /api/exercises` - single direct submission
//!
//! The batch acknowledgment is binary per batch: whole-batch success or
//! failure, with a count of accepted entries. There is no per-entry
//! accept/reject signaling; malformed individual entries are a caller
//! contract violation, not a partial-failure case.
//!
//! The local `synced` flag never crosses the wire. The server stamps its
//! own `synced_at` receipt time on accept.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod entry;
mod error;
mod messages;

pub use entry::EntryPayload;
pub use error::{ProtocolError, ProtocolResult};
pub use messages::{SubmitRequest, SubmitResponse, SyncBatchRequest, SyncBatchResponse};
