//! # Liftlog Server
//!
//! The remote authority for liftlog clients.
//!
//! This crate provides:
//! - A durable entry store with idempotent upsert-by-id merge
//! - Request handlers (batch accept, single accept, queries), testable
//!   without a network
//! - An axum HTTP surface over those handlers
//!
//! # Architecture
//!
//! The server never rejects individual entries within a well-formed
//! batch; the acknowledgment is binary per batch. Re-delivered entries
//! merge by id, so duplicate delivery from overlapping client sync
//! attempts is harmless. Each accepted entry is stamped with a
//! server-side `synced_at` receipt time; the client-assigned
//! `created_at` is never touched.
//!
//! # Endpoints
//!
//! - `POST /api/sync` - batch accept from offline storage
//! - `POST /api/exercises` - single direct submission
//! - `GET /api/exercises` - all entries, optional name filter + paging
//! - `GET /api/exercises/names` - distinct names by usage frequency
//! - `GET /api/exercises/progression/{name}` - chronological series
//! - `DELETE /api/exercises/{id}` - unconditional delete
//! - `GET /healthz`

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod handler;
mod routes;
mod store;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::RequestHandler;
pub use routes::{app_router, serve, AppState};
pub use store::{ProgressionPoint, RemoteStore, StoredEntry};
