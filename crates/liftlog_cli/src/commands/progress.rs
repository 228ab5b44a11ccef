//! Progress command implementation.

use crate::commands::{format_record, open_store};
use liftlog_core::ProgressionStats;
use std::path::Path;

/// Runs the progress command.
pub fn run(data: &Path, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(data)?;
    let series = store.get_by_name(name);

    let Some(stats) = ProgressionStats::from_series(&series) else {
        println!("No sets logged for {name:?}.");
        return Ok(());
    };

    for record in &series {
        println!("{}", format_record(record));
    }
    println!();
    println!("Entries: {}", stats.entries);
    println!("Max:     {}", stats.max);
    println!("Latest:  {}", stats.latest);
    println!("Change:  {:+}", stats.change);
    Ok(())
}
