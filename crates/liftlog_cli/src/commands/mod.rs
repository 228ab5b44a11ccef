//! CLI command implementations.

pub mod delete;
pub mod history;
pub mod last;
pub mod log;
pub mod names;
pub mod progress;
pub mod serve;
pub mod sync;

use liftlog_core::{LogStore, Record};
use liftlog_storage::FileBackend;
use std::path::Path;

/// Opens the local store at the given path, creating parents as needed.
pub fn open_store(path: &Path) -> Result<LogStore, Box<dyn std::error::Error>> {
    let backend = FileBackend::open_with_create_dirs(path)?;
    Ok(LogStore::open(Box::new(backend))?)
}

/// One-line rendering of a record for terminal output.
pub fn format_record(record: &Record) -> String {
    let mut line = format!(
        "{}  {}  {} {}",
        record.created_at.format("%Y-%m-%d %H:%M"),
        record.name,
        record.weight,
        record.unit,
    );
    if let (Some(sets), Some(reps)) = (record.sets, record.reps) {
        line.push_str(&format!("  {sets}x{reps}"));
    } else if let Some(reps) = record.reps {
        line.push_str(&format!("  x{reps}"));
    }
    if let Some(notes) = &record.notes {
        line.push_str(&format!("  ({notes})"));
    }
    if !record.synced {
        line.push_str("  [unsynced]");
    }
    line
}
