//! End-to-end tests: a local store syncing to a real server handler
//! through the loopback transport.

use liftlog_core::{LogStore, RecordDraft};
use liftlog_server::{RemoteStore, RequestHandler, ServerConfig};
use liftlog_storage::{FileBackend, InMemoryBackend};
use liftlog_sync_engine::{
    HttpClient, HttpTransport, LoopbackClient, LoopbackServer, ManualProbe, SyncConfig, SyncEngine,
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Routes loopback posts into the server's request handler.
struct Server(Arc<RequestHandler>);

impl LoopbackServer for Server {
    fn handle_post(&self, path: &str, body: &[u8]) -> Result<Vec<u8>, String> {
        self.0.handle_post(path, body).map_err(|e| e.to_string())
    }
}

struct Harness {
    store: Arc<LogStore>,
    remote: Arc<RemoteStore>,
    probe: Arc<ManualProbe>,
    engine: SyncEngine<HttpTransport<LoopbackClient<Server>>, Arc<ManualProbe>>,
}

fn harness(online: bool) -> Harness {
    let store = Arc::new(LogStore::open(Box::new(InMemoryBackend::new())).unwrap());
    let remote = Arc::new(RemoteStore::open(Box::new(InMemoryBackend::new())).unwrap());
    let handler = Arc::new(RequestHandler::new(
        Arc::clone(&remote),
        ServerConfig::default(),
    ));

    let config = SyncConfig::new("http://localhost:3000");
    let client = LoopbackClient::new(Server(handler));
    let transport = HttpTransport::new("http://localhost:3000", config.timeout, client);
    let probe = Arc::new(ManualProbe::new(online));
    let engine = SyncEngine::new(config, Arc::clone(&store), transport, Arc::clone(&probe));

    Harness {
        store,
        remote,
        probe,
        engine,
    }
}

#[test]
fn offline_log_then_online_sync() {
    let h = harness(false);

    h.store.put(RecordDraft::new("Squat", 100.0)).unwrap();
    h.store
        .put(RecordDraft::new("bench press", 80.0).with_sets(3).with_reps(5))
        .unwrap();

    // Offline: records stay local and unsynced, the server sees nothing.
    assert_eq!(h.engine.attempt_sync().unwrap().synced, 0);
    assert_eq!(h.store.unsynced().len(), 2);
    assert!(h.remote.is_empty());

    // Connectivity returns.
    h.probe.set_online(true);
    assert_eq!(h.engine.attempt_sync().unwrap().synced, 2);
    assert!(h.store.unsynced().is_empty());
    assert_eq!(h.remote.len(), 2);
    assert_eq!(h.remote.names(), vec!["bench press", "squat"]);

    // Everything already acknowledged; the next attempt moves nothing.
    assert_eq!(h.engine.attempt_sync().unwrap().synced, 0);
}

#[test]
fn resubmission_does_not_duplicate_on_the_server() {
    let h = harness(true);
    let record = h.store.put(RecordDraft::new("deadlift", 140.0)).unwrap();

    assert_eq!(h.engine.attempt_sync().unwrap().synced, 1);
    assert_eq!(h.remote.len(), 1);

    // Simulate a lost acknowledgment: the record goes out again with the
    // same id, and the server's upsert-by-id merge absorbs it.
    h.store
        .put(
            RecordDraft::new("deadlift", 140.0)
                .with_id(record.id)
                .with_created_at(record.created_at),
        )
        .unwrap();
    assert_eq!(h.engine.attempt_sync().unwrap().synced, 1);
    assert_eq!(h.remote.len(), 1);
}

#[test]
fn synced_flag_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("liftlog.json");

    {
        let backend = FileBackend::open_with_create_dirs(&path).unwrap();
        let store = Arc::new(LogStore::open(Box::new(backend)).unwrap());
        store.put(RecordDraft::new("squat", 100.0)).unwrap();

        let remote = Arc::new(RemoteStore::open(Box::new(InMemoryBackend::new())).unwrap());
        let handler = Arc::new(RequestHandler::new(remote, ServerConfig::default()));
        let config = SyncConfig::new("http://localhost:3000");
        let transport = HttpTransport::new(
            "http://localhost:3000",
            config.timeout,
            LoopbackClient::new(Server(handler)),
        );
        let engine = SyncEngine::new(config, Arc::clone(&store), transport, ManualProbe::new(true));
        assert_eq!(engine.attempt_sync().unwrap().synced, 1);
    }

    let backend = FileBackend::open(&path).unwrap();
    let reopened = LogStore::open(Box::new(backend)).unwrap();
    assert_eq!(reopened.len(), 1);
    assert!(reopened.unsynced().is_empty());
}

#[test]
fn server_rejection_leaves_the_batch_pending() {
    let store = Arc::new(LogStore::open(Box::new(InMemoryBackend::new())).unwrap());
    let remote = Arc::new(RemoteStore::open(Box::new(InMemoryBackend::new())).unwrap());
    // A server that accepts at most one entry per batch.
    let handler = Arc::new(RequestHandler::new(
        Arc::clone(&remote),
        ServerConfig::default().with_max_batch_size(1),
    ));

    let config = SyncConfig::new("http://localhost:3000");
    let transport = HttpTransport::new(
        "http://localhost:3000",
        config.timeout,
        LoopbackClient::new(Server(handler)),
    );
    let engine = SyncEngine::new(
        config,
        Arc::clone(&store),
        transport,
        ManualProbe::new(true),
    );

    store.put(RecordDraft::new("squat", 100.0)).unwrap();
    store.put(RecordDraft::new("bench", 80.0)).unwrap();

    // Whole-batch semantics: the server takes none of it, the client
    // marks none of it.
    assert_eq!(engine.attempt_sync().unwrap().synced, 0);
    assert_eq!(store.unsynced().len(), 2);
    assert!(remote.is_empty());
    assert!(engine.stats().last_error.is_some());
}

/// Fails the first request, then delegates to the real server.
struct FlakyClient {
    inner: LoopbackClient<Server>,
    failed_once: AtomicBool,
    calls: Arc<AtomicU64>,
}

impl HttpClient for FlakyClient {
    fn post(&self, url: &str, body: Vec<u8>, timeout: Duration) -> Result<Vec<u8>, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.failed_once.swap(true, Ordering::SeqCst) {
            return Err("connection reset".to_string());
        }
        self.inner.post(url, body, timeout)
    }

    fn is_healthy(&self) -> bool {
        true
    }
}

#[test]
fn one_network_blip_does_not_strand_the_batch() {
    let store = Arc::new(LogStore::open(Box::new(InMemoryBackend::new())).unwrap());
    let remote = Arc::new(RemoteStore::open(Box::new(InMemoryBackend::new())).unwrap());
    let handler = Arc::new(RequestHandler::new(
        Arc::clone(&remote),
        ServerConfig::default(),
    ));

    let config = SyncConfig::new("http://localhost:3000");
    let calls = Arc::new(AtomicU64::new(0));
    let client = FlakyClient {
        inner: LoopbackClient::new(Server(handler)),
        failed_once: AtomicBool::new(false),
        calls: Arc::clone(&calls),
    };
    let transport = HttpTransport::new("http://localhost:3000", config.timeout, client);
    let engine = SyncEngine::new(config, Arc::clone(&store), transport, ManualProbe::new(true));

    store.put(RecordDraft::new("squat", 100.0)).unwrap();

    // First attempt hits the blip: nothing marked, nothing on the server.
    assert_eq!(engine.attempt_sync().unwrap().synced, 0);
    assert_eq!(store.unsynced().len(), 1);
    assert!(remote.is_empty());
    assert!(engine.stats().last_error.is_some());

    // The very next attempt goes back to the network and drains the batch.
    assert_eq!(engine.attempt_sync().unwrap().synced, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(store.unsynced().is_empty());
    assert_eq!(remote.len(), 1);
    assert!(engine.stats().last_error.is_none());
}
