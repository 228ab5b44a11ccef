//! # Liftlog Storage
//!
//! Snapshot storage backends for liftlog.
//!
//! This crate provides the lowest-level storage abstraction for liftlog.
//! Backends are **opaque snapshot stores** - they hold a single byte blob
//! and replace it atomically. They do not interpret the data they store;
//! the record stores own all format interpretation.
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral storage
//! - [`FileBackend`] - For persistent storage using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use liftlog_storage::{SnapshotBackend, InMemoryBackend};
//!
//! let backend = InMemoryBackend::new();
//! backend.persist(b"hello world").unwrap();
//! assert_eq!(backend.load().unwrap().as_deref(), Some(&b"hello world"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::SnapshotBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
