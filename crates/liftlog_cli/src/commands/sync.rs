//! Sync command implementation.

use crate::commands::open_store;
use liftlog_sync_engine::{
    AlwaysOnline, HttpClient, HttpTransport, SyncConfig, SyncEngine,
};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// [`HttpClient`] backed by a blocking ureq agent.
struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    fn new() -> Self {
        Self {
            agent: ureq::Agent::new(),
        }
    }
}

impl HttpClient for UreqClient {
    fn post(&self, url: &str, body: Vec<u8>, timeout: Duration) -> Result<Vec<u8>, String> {
        let response = self
            .agent
            .post(url)
            .timeout(timeout)
            .set("Content-Type", "application/json")
            .send_bytes(&body)
            .map_err(|e| e.to_string())?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| e.to_string())?;
        Ok(bytes)
    }

    fn is_healthy(&self) -> bool {
        true
    }
}

/// Runs the sync command: one explicit push attempt.
pub fn run(data: &Path, server: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(open_store(data)?);
    let pending = store.unsynced().len();
    if pending == 0 {
        println!("Nothing to sync.");
        return Ok(());
    }

    let config = SyncConfig::new(server);
    let transport = HttpTransport::new(server, config.timeout, UreqClient::new());
    let engine = SyncEngine::new(config, store, transport, AlwaysOnline);

    let outcome = engine.attempt_sync()?;
    if outcome.synced > 0 {
        println!("Synced {} of {pending} set(s).", outcome.synced);
    } else {
        let reason = engine
            .stats()
            .last_error
            .unwrap_or_else(|| "unknown error".to_string());
        println!("Sync failed, {pending} set(s) still pending: {reason}");
    }
    Ok(())
}
