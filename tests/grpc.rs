use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log_service::config::ServiceConfig;
use log_service::error::{ServerError, StoreError};
use log_service::handler::LOG_COLLECTION;
use log_service::memory::MemoryStore;
use log_service::proto::log_service_client::LogServiceClient;
use log_service::proto::LogRequest;
use log_service::server;
use log_service::store::{DocumentStore, SearchQuery};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tonic::transport::Channel;

struct TestServer {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start(store: Arc<dyn DocumentStore>) -> Self {
        let listener = server::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            server::serve(listener, store, async {
                let _ = stopped.await;
            })
            .await
            .unwrap();
        });

        TestServer { addr, stop, handle }
    }

    async fn client(&self) -> LogServiceClient<Channel> {
        LogServiceClient::connect(format!("http://{}", self.addr))
            .await
            .unwrap()
    }

    async fn shutdown(self) {
        let _ = self.stop.send(());
        self.handle.await.unwrap();
    }
}

fn disk_full() -> LogRequest {
    LogRequest {
        level: "error".to_string(),
        message: "disk full".to_string(),
        service: "billing".to_string(),
        host: "h1".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn write_log_persists_canonical_document() {
    let store = Arc::new(MemoryStore::new());
    let server = TestServer::start(store.clone()).await;
    let mut client = server.client().await;

    let before = Utc::now();
    let resp = client.write_log(disk_full()).await.unwrap().into_inner();
    let after = Utc::now();

    assert!(resp.success);
    assert_eq!(resp.error, "");

    let docs = store
        .search(LOG_COLLECTION, &SearchQuery::new("service", "billing", 5))
        .await
        .unwrap();
    assert_eq!(docs.len(), 1);
    let doc = &docs[0];
    assert_eq!(doc["level"], "error");
    assert_eq!(doc["message"], "disk full");
    assert_eq!(doc["service"], "billing");
    assert_eq!(doc["host"], "h1");
    for absent in ["module", "request_id", "user_id", "error", "extra"] {
        assert!(!doc.contains_key(absent), "{absent} should be omitted");
    }
    let ts: DateTime<Utc> = doc["timestamp"].as_str().unwrap().parse().unwrap();
    assert!(ts >= before && ts <= after);

    server.shutdown().await;
}

#[tokio::test]
async fn extra_metadata_round_trips_through_rpc() {
    let store = Arc::new(MemoryStore::new());
    let server = TestServer::start(store.clone()).await;
    let mut client = server.client().await;

    let mut req = disk_full();
    req.request_id = "req-7".to_string();
    req.extra = HashMap::from([("retry_count".to_string(), "3".to_string())]);
    assert!(client.write_log(req).await.unwrap().into_inner().success);

    let docs = store.documents(LOG_COLLECTION).await;
    assert_eq!(docs[0]["extra"]["retry_count"], "3");
    assert_eq!(docs[0]["request_id"], "req-7");

    server.shutdown().await;
}

#[tokio::test]
async fn repeated_submissions_create_distinct_documents() {
    let store = Arc::new(MemoryStore::new());
    let server = TestServer::start(store.clone()).await;
    let mut client = server.client().await;

    client.write_log(disk_full()).await.unwrap();
    client.write_log(disk_full()).await.unwrap();

    let docs = store
        .search(LOG_COLLECTION, &SearchQuery::new("service", "billing", 5))
        .await
        .unwrap();
    assert_eq!(docs.len(), 2);

    server.shutdown().await;
}

#[tokio::test]
async fn store_failure_keeps_server_running() {
    let store = Arc::new(MemoryStore::failing("connection refused"));
    let server = TestServer::start(store).await;
    let mut client = server.client().await;

    for _ in 0..2 {
        let resp = client.write_log(disk_full()).await.unwrap().into_inner();
        assert!(!resp.success);
        assert!(!resp.error.is_empty());
    }

    server.shutdown().await;
}

#[tokio::test]
async fn search_without_matches_is_empty() {
    let store = Arc::new(MemoryStore::new());
    let server = TestServer::start(store.clone()).await;
    let mut client = server.client().await;
    client.write_log(disk_full()).await.unwrap();

    let docs = store
        .search(LOG_COLLECTION, &SearchQuery::new("service", "payments", 5))
        .await
        .unwrap();
    assert!(docs.is_empty());

    server.shutdown().await;
}

#[tokio::test]
async fn binding_a_taken_port_is_a_listen_error() {
    let taken = server::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = taken.local_addr().unwrap();

    let err = server::bind(addr).await.unwrap_err();
    assert!(matches!(err, ServerError::Listen { .. }));
}

#[tokio::test]
async fn run_fails_on_store_before_binding_port() {
    // Occupy the configured port: if `run` tried to bind before connecting,
    // it would fail with a listen error instead.
    let occupied = server::bind(SocketAddr::from(([0, 0, 0, 0], 0)))
        .await
        .unwrap();
    let port = occupied.local_addr().unwrap().port();

    let closed_port = {
        let spare = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        spare.local_addr().unwrap().port()
    };

    let config = ServiceConfig::from_lookup(|key| match key {
        "PORT" => Some(port.to_string()),
        "ELASTIC_ADDRESS" => Some(format!("http://127.0.0.1:{closed_port}")),
        _ => None,
    })
    .unwrap();

    let err = server::run(config).await.unwrap_err();
    assert!(
        matches!(err, ServerError::Store(StoreError::Connection { .. })),
        "unexpected error: {err}"
    );
}
