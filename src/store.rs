use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A stored document as returned by a search.
pub type Document = Map<String, Value>;

/// Single-field match query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub field: String,
    pub value: String,
    /// Maximum number of documents returned.
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(field: impl Into<String>, value: impl Into<String>, limit: usize) -> Self {
        SearchQuery {
            field: field.into(),
            value: value.into(),
            limit,
        }
    }
}

/// Destination for documents produced by the log handler.
///
/// One instance is created at startup and shared by every request, so
/// implementations must be safe for concurrent use.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Write one document into `collection`.
    ///
    /// **Returns**
    /// - `Ok(())` once the document is visible to subsequent reads.
    /// - `Err(..)` on encoding, transport or store-reported failure.
    async fn index_document(&self, collection: &str, document: &Value) -> Result<(), StoreError>;

    /// Find up to `query.limit` documents whose `query.field` matches
    /// `query.value`, in the store's relevance order.
    ///
    /// No match is an empty vector, not an error.
    async fn search(&self, collection: &str, query: &SearchQuery) -> Result<Vec<Document>, StoreError>;
}
