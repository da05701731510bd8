use std::sync::Arc;

use chrono::Utc;
use tonic::{Request, Response, Status};
use tracing::{debug, error};

use crate::entry::LogEntry;
use crate::error::StoreError;
use crate::proto::log_service_server::LogService;
use crate::proto::{LogRequest, LogResponse};
use crate::store::DocumentStore;

/// Collection every submission is written to.
pub const LOG_COLLECTION: &str = "logs";

/// gRPC handler for `log.LogService`.
///
/// Holds the shared store handle; every submission is processed
/// independently.
#[derive(Clone)]
pub struct LogHandler {
    store: Arc<dyn DocumentStore>,
}

impl LogHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        LogHandler { store }
    }

    /// Persist one submission and report the outcome in-band.
    ///
    /// Store failures never escape as an error: they are logged and
    /// returned as `success: false` with the error text.
    pub async fn write_log(&self, request: LogRequest) -> LogResponse {
        let entry = LogEntry::from_request(request, Utc::now());

        match self.persist(&entry).await {
            Ok(()) => {
                debug!(service = %entry.service, level = %entry.level, "log entry stored");
                LogResponse::ok()
            }
            Err(e) => {
                error!(
                    service = %entry.service,
                    collection = LOG_COLLECTION,
                    error = %e,
                    "failed to store log entry"
                );
                LogResponse::failed(e.to_string())
            }
        }
    }

    async fn persist(&self, entry: &LogEntry) -> Result<(), StoreError> {
        let document = serde_json::to_value(entry).map_err(StoreError::Serialization)?;
        self.store.index_document(LOG_COLLECTION, &document).await
    }
}

#[tonic::async_trait]
impl LogService for LogHandler {
    async fn write_log(
        &self,
        request: Request<LogRequest>,
    ) -> Result<Response<LogResponse>, Status> {
        let response = LogHandler::write_log(self, request.into_inner()).await;
        Ok(Response::new(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ExtraValue;
    use crate::memory::MemoryStore;
    use crate::store::SearchQuery;
    use chrono::DateTime;
    use std::collections::HashMap;

    fn disk_full() -> LogRequest {
        LogRequest {
            level: "error".to_string(),
            message: "disk full".to_string(),
            service: "billing".to_string(),
            host: "h1".to_string(),
            ..Default::default()
        }
    }

    fn handler() -> (LogHandler, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (LogHandler::new(store.clone()), store)
    }

    #[tokio::test]
    async fn stores_submission_with_server_timestamp() {
        let (handler, store) = handler();

        let before = Utc::now();
        let resp = handler.write_log(disk_full()).await;
        let after = Utc::now();

        assert_eq!(resp, LogResponse::ok());
        let docs = store.documents(LOG_COLLECTION).await;
        assert_eq!(docs.len(), 1);

        let entry: LogEntry = serde_json::from_value(docs[0].clone().into()).unwrap();
        assert_eq!(entry.level, "error");
        assert_eq!(entry.message, "disk full");
        assert_eq!(entry.service, "billing");
        assert_eq!(entry.host.as_deref(), Some("h1"));
        assert!(entry.timestamp >= before && entry.timestamp <= after);

        for absent in ["module", "request_id", "user_id", "error", "extra"] {
            assert!(!docs[0].contains_key(absent), "{absent} should be omitted");
        }
    }

    #[tokio::test]
    async fn time_like_extra_does_not_override_timestamp() {
        let (handler, store) = handler();
        let mut req = disk_full();
        req.extra = HashMap::from([("timestamp".to_string(), "2001-01-01T00:00:00Z".to_string())]);

        let before = Utc::now();
        handler.write_log(req).await;

        let docs = store.documents(LOG_COLLECTION).await;
        let ts: DateTime<Utc> = docs[0]["timestamp"].as_str().unwrap().parse().unwrap();
        assert!(ts >= before);
        assert_eq!(docs[0]["extra"]["timestamp"], "2001-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn extra_metadata_is_kept() {
        let (handler, store) = handler();
        let mut req = disk_full();
        req.extra = HashMap::from([("retry_count".to_string(), "3".to_string())]);

        assert!(handler.write_log(req).await.success);

        let hits = store
            .search(LOG_COLLECTION, &SearchQuery::new("service", "billing", 5))
            .await
            .unwrap();
        let entry: LogEntry = serde_json::from_value(hits[0].clone().into()).unwrap();
        assert_eq!(entry.extra.unwrap()["retry_count"], ExtraValue::String("3".to_string()));
    }

    #[tokio::test]
    async fn duplicate_submissions_are_not_deduplicated() {
        let (handler, store) = handler();
        handler.write_log(disk_full()).await;
        handler.write_log(disk_full()).await;
        assert_eq!(store.documents(LOG_COLLECTION).await.len(), 2);
    }

    #[tokio::test]
    async fn store_failure_is_reported_in_band() {
        let handler = LogHandler::new(Arc::new(MemoryStore::failing("cluster unavailable")));

        let resp = handler.write_log(disk_full()).await;
        assert!(!resp.success);
        assert!(resp.error.contains("cluster unavailable"));

        let rpc = LogService::write_log(&handler, Request::new(disk_full()))
            .await
            .expect("failures are returned in the response body");
        assert!(!rpc.into_inner().success);
    }
}
