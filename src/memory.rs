use crate::error::StoreError;
use crate::store::{Document, DocumentStore, SearchQuery};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// A store that keeps documents in process memory.
///
/// Useful for running the gRPC surface without a cluster, and for unit
/// tests that need to inspect what the handler wrote. Search matches a
/// field by exact equality of its string form.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    failure: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every operation with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        MemoryStore {
            collections: Mutex::default(),
            failure: Some(reason.into()),
        }
    }

    /// Snapshot of every document in `collection`, in insertion order.
    pub async fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .lock()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn check(&self, operation: &'static str, collection: &str) -> Result<(), StoreError> {
        match &self.failure {
            Some(reason) => Err(StoreError::Rejected {
                operation,
                collection: collection.to_string(),
                status: 503,
                body: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn field_matches(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(s) => s == expected,
        Value::Number(_) | Value::Bool(_) => value.to_string() == expected,
        _ => false,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn index_document(&self, collection: &str, document: &Value) -> Result<(), StoreError> {
        self.check("index", collection)?;
        let Value::Object(doc) = document else {
            return Err(StoreError::Rejected {
                operation: "index",
                collection: collection.to_string(),
                status: 400,
                body: "document must be a JSON object".to_string(),
            });
        };

        self.collections
            .lock()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());
        Ok(())
    }

    async fn search(&self, collection: &str, query: &SearchQuery) -> Result<Vec<Document>, StoreError> {
        self.check("search", collection)?;
        let collections = self.collections.lock().await;
        let docs = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| {
                        doc.get(&query.field)
                            .map(|v| field_matches(v, &query.value))
                            .unwrap_or(false)
                    })
                    .take(query.limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(docs)
    }
}
