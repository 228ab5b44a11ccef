//! Transport layer abstraction for sync operations.

use crate::error::{SyncError, SyncResult};
use liftlog_sync_protocol::{SyncBatchRequest, SyncBatchResponse};

/// A sync transport handles network communication with the remote
/// authority.
///
/// This trait abstracts the network layer, allowing for different
/// implementations (HTTP, loopback, mock for testing).
pub trait SyncTransport: Send + Sync {
    /// Ships a batch of entries to the remote authority.
    fn push_batch(&self, request: &SyncBatchRequest) -> SyncResult<SyncBatchResponse>;

    /// Checks if the transport is connected.
    fn is_connected(&self) -> bool;
}

impl<T: SyncTransport + ?Sized> SyncTransport for std::sync::Arc<T> {
    fn push_batch(&self, request: &SyncBatchRequest) -> SyncResult<SyncBatchResponse> {
        (**self).push_batch(request)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}

/// A mock transport for testing.
#[derive(Debug, Default)]
pub struct MockTransport {
    connected: std::sync::atomic::AtomicBool,
    response: parking_lot::Mutex<Option<SyncBatchResponse>>,
    pushes: std::sync::atomic::AtomicU64,
    last_batch: parking_lot::Mutex<Option<SyncBatchRequest>>,
}

impl MockTransport {
    /// Creates a new mock transport, connected and with no response set.
    pub fn new() -> Self {
        Self {
            connected: std::sync::atomic::AtomicBool::new(true),
            response: parking_lot::Mutex::new(None),
            pushes: std::sync::atomic::AtomicU64::new(0),
            last_batch: parking_lot::Mutex::new(None),
        }
    }

    /// Sets the response returned by the next pushes.
    pub fn set_response(&self, response: SyncBatchResponse) {
        *self.response.lock() = Some(response);
    }

    /// Sets the connected state.
    pub fn set_connected(&self, connected: bool) {
        self.connected
            .store(connected, std::sync::atomic::Ordering::SeqCst);
    }

    /// Returns how many batches were pushed.
    pub fn pushes(&self) -> u64 {
        self.pushes.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Returns the most recently pushed batch.
    pub fn last_batch(&self) -> Option<SyncBatchRequest> {
        self.last_batch.lock().clone()
    }
}

impl SyncTransport for MockTransport {
    fn push_batch(&self, request: &SyncBatchRequest) -> SyncResult<SyncBatchResponse> {
        if !self.is_connected() {
            return Err(SyncError::NotConnected);
        }

        self.pushes
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        *self.last_batch.lock() = Some(request.clone());

        self.response
            .lock()
            .clone()
            .ok_or_else(|| SyncError::Protocol("No mock response set".into()))
    }

    fn is_connected(&self) -> bool {
        self.connected.load(std::sync::atomic::Ordering::SeqCst)
    }
}
