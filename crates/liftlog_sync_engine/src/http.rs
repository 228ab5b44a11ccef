//! HTTP transport implementation.
//!
//! This module provides an HTTP-based transport for the sync engine.
//! The actual HTTP client is abstracted via a trait to allow different
//! implementations (reqwest, ureq, platform WebView fetch, etc.).

use crate::error::{SyncError, SyncResult};
use crate::transport::SyncTransport;
use liftlog_sync_protocol::{SyncBatchRequest, SyncBatchResponse};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport. A timed-out
/// request should surface as an `Err`; the transport classifies it as
/// retryable.
pub trait HttpClient: Send + Sync {
    /// Sends a POST request with a JSON body and returns the response body.
    fn post(&self, url: &str, body: Vec<u8>, timeout: Duration) -> Result<Vec<u8>, String>;

    /// Checks if the client is connected/healthy.
    fn is_healthy(&self) -> bool;
}

/// HTTP-based sync transport.
///
/// Uses JSON encoding for request/response bodies, matching the remote
/// authority's `/api/sync` endpoint.
///
/// Every push goes to the network as long as the client reports healthy;
/// a failed request never gates later attempts. [`is_connected`] and
/// [`last_error`] report the outcome of the most recent push for status
/// display only.
///
/// [`is_connected`]: SyncTransport::is_connected
/// [`last_error`]: HttpTransport::last_error
pub struct HttpTransport<C: HttpClient> {
    /// Base URL of the remote authority (e.g., "https://log.example.com").
    base_url: String,
    /// Request timeout.
    timeout: Duration,
    /// HTTP client implementation.
    client: C,
    /// Whether the last push succeeded.
    connected: AtomicBool,
    /// Last error message.
    last_error: RwLock<Option<String>>,
}

impl<C: HttpClient> HttpTransport<C> {
    /// Creates a new HTTP transport.
    pub fn new(base_url: impl Into<String>, timeout: Duration, client: C) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            client,
            connected: AtomicBool::new(true),
            last_error: RwLock::new(None),
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the last error message.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().ok().and_then(|e| e.clone())
    }

    fn set_error(&self, err: &str) {
        if let Ok(mut slot) = self.last_error.write() {
            *slot = Some(err.to_string());
        }
    }

    fn clear_error(&self) {
        if let Ok(mut slot) = self.last_error.write() {
            *slot = None;
        }
    }
}

impl<C: HttpClient> SyncTransport for HttpTransport<C> {
    fn push_batch(&self, request: &SyncBatchRequest) -> SyncResult<SyncBatchResponse> {
        if !self.client.is_healthy() {
            return Err(SyncError::NotConnected);
        }

        let body = request
            .encode()
            .map_err(|e| SyncError::Protocol(format!("Failed to encode request: {e}")))?;

        let url = format!("{}/api/sync", self.base_url);
        let response_body = self.client.post(&url, body, self.timeout).map_err(|e| {
            self.set_error(&e);
            self.connected.store(false, Ordering::SeqCst);
            SyncError::Transport(e)
        })?;

        self.connected.store(true, Ordering::SeqCst);
        self.clear_error();

        SyncBatchResponse::decode(&response_body)
            .map_err(|e| SyncError::Protocol(format!("Failed to decode response: {e}")))
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst) && self.client.is_healthy()
    }
}

/// A loopback HTTP client that routes requests directly to a server.
///
/// Useful for testing without actual network overhead.
pub struct LoopbackClient<S: LoopbackServer> {
    server: S,
}

impl<S: LoopbackServer + Send + Sync> LoopbackClient<S> {
    /// Creates a new loopback client connected to the given server.
    pub fn new(server: S) -> Self {
        Self { server }
    }
}

/// Trait for servers that can handle loopback requests.
pub trait LoopbackServer {
    /// Handles a POST request and returns the response body.
    fn handle_post(&self, path: &str, body: &[u8]) -> Result<Vec<u8>, String>;
}

impl<S: LoopbackServer + Send + Sync> HttpClient for LoopbackClient<S> {
    fn post(&self, url: &str, body: Vec<u8>, _timeout: Duration) -> Result<Vec<u8>, String> {
        let path = url.find("/api/").map(|i| &url[i..]).unwrap_or(url);
        self.server.handle_post(path, &body)
    }

    fn is_healthy(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;

    struct TestClient {
        response: RwLock<Option<Result<Vec<u8>, String>>>,
        healthy: AtomicBool,
        calls: AtomicU64,
    }

    impl TestClient {
        fn new() -> Self {
            Self {
                response: RwLock::new(None),
                healthy: AtomicBool::new(true),
                calls: AtomicU64::new(0),
            }
        }

        fn set_response(&self, resp: Vec<u8>) {
            *self.response.write().unwrap() = Some(Ok(resp));
        }

        fn set_failure(&self, message: &str) {
            *self.response.write().unwrap() = Some(Err(message.to_string()));
        }

        fn calls(&self) -> u64 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl HttpClient for TestClient {
        fn post(&self, _url: &str, _body: Vec<u8>, _timeout: Duration) -> Result<Vec<u8>, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .read()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Err("No response set".into()))
        }

        fn is_healthy(&self) -> bool {
            self.healthy.load(Ordering::SeqCst)
        }
    }

    fn transport(client: TestClient) -> HttpTransport<TestClient> {
        HttpTransport::new(
            "https://log.example.com",
            Duration::from_secs(5),
            client,
        )
    }

    #[test]
    fn transport_creation() {
        let t = transport(TestClient::new());
        assert_eq!(t.base_url(), "https://log.example.com");
        assert!(t.is_connected());
        assert!(t.last_error().is_none());
    }

    #[test]
    fn transport_push_decodes_response() {
        let client = TestClient::new();
        client.set_response(SyncBatchResponse::success(2).encode().unwrap());

        let t = transport(client);
        let response = t.push_batch(&SyncBatchRequest::new(vec![])).unwrap();
        assert!(response.success);
        assert_eq!(response.synced, 2);
    }

    #[test]
    fn transport_failure_records_error() {
        let client = TestClient::new();
        client.set_failure("connection refused");

        let t = transport(client);
        let result = t.push_batch(&SyncBatchRequest::new(vec![]));
        assert!(matches!(result, Err(SyncError::Transport(_))));
        assert!(!t.is_connected());
        assert_eq!(t.last_error().as_deref(), Some("connection refused"));
    }

    #[test]
    fn failed_push_does_not_gate_the_next_one() {
        let client = TestClient::new();
        client.set_failure("connection reset");

        let t = transport(client);
        assert!(t.push_batch(&SyncBatchRequest::new(vec![])).is_err());
        assert_eq!(t.client.calls(), 1);

        // The next push still reaches the network, and a success resets
        // the status.
        t.client
            .set_response(SyncBatchResponse::success(0).encode().unwrap());
        let response = t.push_batch(&SyncBatchRequest::new(vec![])).unwrap();
        assert!(response.success);
        assert_eq!(t.client.calls(), 2);
        assert!(t.is_connected());
        assert!(t.last_error().is_none());
    }

    #[test]
    fn transport_bad_response_is_protocol_error() {
        let client = TestClient::new();
        client.set_response(b"not json".to_vec());

        let t = transport(client);
        let result = t.push_batch(&SyncBatchRequest::new(vec![]));
        assert!(matches!(result, Err(SyncError::Protocol(_))));
    }

    #[test]
    fn transport_unhealthy_client() {
        let client = TestClient::new();
        client.healthy.store(false, Ordering::SeqCst);
        let t = transport(client);
        assert!(!t.is_connected());

        // An unhealthy client short-circuits without a network call.
        let result = t.push_batch(&SyncBatchRequest::new(vec![]));
        assert!(matches!(result, Err(SyncError::NotConnected)));
        assert_eq!(t.client.calls(), 0);
    }
}
