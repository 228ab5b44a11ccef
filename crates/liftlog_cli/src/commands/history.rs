//! History command implementation.

use crate::commands::{format_record, open_store};
use std::path::Path;

/// Runs the history command.
pub fn run(
    data: &Path,
    name: Option<&str>,
    limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(data)?;

    let mut records = match name {
        // get_by_name is chronological; history reads newest first.
        Some(name) => {
            let mut series = store.get_by_name(name);
            series.reverse();
            series
        }
        None => store.get_all(),
    };
    if let Some(limit) = limit {
        records.truncate(limit);
    }

    if records.is_empty() {
        println!("No sets logged.");
        return Ok(());
    }
    for record in &records {
        println!("{}", format_record(record));
    }
    Ok(())
}
