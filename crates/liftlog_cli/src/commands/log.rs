//! Log command implementation.

use crate::commands::open_store;
use liftlog_core::{RecordDraft, WeightUnit};
use std::path::Path;

/// Runs the log command.
pub fn run(
    data: &Path,
    name: &str,
    weight: f64,
    sets: Option<u32>,
    reps: Option<u32>,
    unit: &str,
    notes: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let unit: WeightUnit = unit
        .parse()
        .map_err(|_| format!("Unknown unit {unit:?} (expected kg or lb)"))?;

    let store = open_store(data)?;
    let mut draft = RecordDraft::new(name, weight).with_unit(unit);
    if let Some(sets) = sets {
        draft = draft.with_sets(sets);
    }
    if let Some(reps) = reps {
        draft = draft.with_reps(reps);
    }
    if let Some(notes) = notes {
        draft = draft.with_notes(notes);
    }

    let record = store.put(draft)?;
    println!("Logged {} {} {} ({})", record.name, record.weight, record.unit, record.id);
    Ok(())
}
