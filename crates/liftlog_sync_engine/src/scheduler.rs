//! Periodic sync scheduling.
//!
//! Retry is re-invocation: the scheduler calls
//! [`SyncEngine::attempt_sync`] on a fixed interval and immediately when
//! connectivity transitions from offline to online. Both triggers hit the
//! same idempotent entry point, so no coordination beyond the engine's
//! own in-flight guard is needed.

use crate::connectivity::ConnectivityProbe;
use crate::engine::SyncEngine;
use crate::transport::SyncTransport;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Background driver for periodic sync attempts.
///
/// Owns a worker thread; dropping the scheduler (or calling
/// [`SyncScheduler::shutdown`]) stops it.
pub struct SyncScheduler {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SyncScheduler {
    /// Spawns the scheduler for the given engine.
    ///
    /// The first attempt fires immediately (the app just started; catch up
    /// on anything logged while it was closed), then on every
    /// `sync_interval` from the engine config, plus once on each
    /// offline→online transition.
    pub fn spawn<T, P>(engine: Arc<SyncEngine<T, P>>) -> Self
    where
        T: SyncTransport + 'static,
        P: ConnectivityProbe + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let interval = engine.config().sync_interval;

        let handle = std::thread::spawn(move || {
            let tick = Duration::from_millis(50).min(interval.max(Duration::from_millis(1)));
            let mut elapsed = interval; // fire immediately on startup
            let mut was_online = false;

            while !flag.load(Ordering::SeqCst) {
                let online = engine.is_online();
                let came_online = online && !was_online;
                was_online = online;

                if elapsed >= interval || came_online {
                    elapsed = Duration::ZERO;
                    if let Err(e) = engine.attempt_sync() {
                        tracing::error!(error = %e, "scheduled sync hit a store error");
                    }
                }

                std::thread::sleep(tick);
                elapsed += tick;
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Stops the worker thread and waits for it to exit.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}
