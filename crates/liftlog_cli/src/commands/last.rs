//! Last command implementation.

use crate::commands::{format_record, open_store};
use std::path::Path;

/// Runs the last command.
pub fn run(data: &Path, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(data)?;
    match store.get_last_by_name(name) {
        Some(record) => println!("{}", format_record(&record)),
        None => println!("No sets logged for {name:?}."),
    }
    Ok(())
}
