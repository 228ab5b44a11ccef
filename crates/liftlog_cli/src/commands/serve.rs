//! Serve command implementation.

use liftlog_server::ServerConfig;
use std::path::Path;

/// Runs the serve command.
pub fn run(data: &Path, bind: &str, max_batch: usize) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::new()
        .with_bind_addr(bind)
        .with_data_path(data)
        .with_max_batch_size(max_batch);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(liftlog_server::serve(config))?;
    Ok(())
}
