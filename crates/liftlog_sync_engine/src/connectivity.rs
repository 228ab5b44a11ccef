//! Connectivity probing.
//!
//! The engine checks connectivity before doing any network work; an
//! offline attempt is a silent no-op. The probe is a trait so platforms
//! can plug in whatever signal they have (OS notifications, a reachability
//! ping, a UI toggle).

use std::sync::atomic::{AtomicBool, Ordering};

/// Reports whether the network is currently reachable.
pub trait ConnectivityProbe: Send + Sync {
    /// Returns true if a sync attempt should go to the network.
    fn is_online(&self) -> bool;
}

impl<P: ConnectivityProbe + ?Sized> ConnectivityProbe for std::sync::Arc<P> {
    fn is_online(&self) -> bool {
        (**self).is_online()
    }
}

/// A probe that always reports online.
///
/// Useful when the transport itself is the only connectivity signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysOnline;

impl ConnectivityProbe for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// A probe whose state is set explicitly.
///
/// Used in tests and by hosts that receive connectivity events.
#[derive(Debug)]
pub struct ManualProbe {
    online: AtomicBool,
}

impl ManualProbe {
    /// Creates a probe with the given initial state.
    #[must_use]
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    /// Updates the connectivity state.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl ConnectivityProbe for ManualProbe {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
