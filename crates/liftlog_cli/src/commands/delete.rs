//! Delete command implementation.

use crate::commands::open_store;
use liftlog_core::RecordId;
use std::path::Path;

/// Runs the delete command.
///
/// Deletion is local only; a copy already pushed to the server stays
/// there.
pub fn run(data: &Path, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let id: RecordId = id.parse().map_err(|_| format!("Invalid record id {id:?}"))?;
    let store = open_store(data)?;
    store.remove(id)?;
    println!("Deleted {id}");
    Ok(())
}
