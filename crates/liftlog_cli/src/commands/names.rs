//! Names command implementation.

use crate::commands::open_store;
use std::path::Path;

/// Runs the names command.
pub fn run(data: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(data)?;
    for name in store.names() {
        println!("{name}");
    }
    Ok(())
}
