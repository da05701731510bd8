use crate::error::StoreError;
use crate::store::{Document, DocumentStore, SearchQuery};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for [`ElasticClient`].
#[derive(Clone, Debug)]
pub struct ElasticConfig {
    /// Node base URLs, e.g. "http://localhost:9200".
    pub addresses: Vec<String>,
    /// Basic-auth user. `None` means unauthenticated.
    pub username: Option<String>,
    pub password: Option<String>,
    /// Upper bound for the liveness check performed by [`ElasticClient::connect`].
    pub connect_timeout: Duration,
    /// Optional upper bound for index and search calls.
    pub request_timeout: Option<Duration>,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            addresses: vec!["http://localhost:9200".to_string()],
            username: None,
            password: None,
            connect_timeout: Duration::from_secs(5),
            request_timeout: None,
        }
    }
}

/// Elasticsearch implementation of [`DocumentStore`] over the REST API.
///
/// The underlying `reqwest` client pools connections and is cheap to share;
/// requests rotate across the configured nodes.
pub struct ElasticClient {
    client: Client,
    config: ElasticConfig,
    next_node: AtomicUsize,
}

#[derive(Deserialize)]
struct InfoResponse {
    #[serde(default)]
    cluster_name: Option<String>,
    #[serde(default)]
    version: Option<InfoVersion>,
}

#[derive(Deserialize)]
struct InfoVersion {
    number: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Deserialize)]
struct Hits {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_source", default)]
    source: Document,
}

impl ElasticClient {
    /// Create a client and verify the cluster is reachable.
    ///
    /// A node that cannot be reached within `connect_timeout`, or that
    /// answers with a non-success status (bad credentials, for instance),
    /// fails the call immediately instead of surfacing on the first write.
    pub async fn connect(config: ElasticConfig) -> Result<Self, StoreError> {
        if config.addresses.is_empty() {
            return Err(StoreError::NoAddresses);
        }

        let client = Client::builder()
            .build()
            .map_err(|source| StoreError::Connection {
                address: config.addresses[0].clone(),
                source,
            })?;

        let store = ElasticClient {
            client,
            config,
            next_node: AtomicUsize::new(0),
        };
        store.ping().await?;
        Ok(store)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let node = self.node();
        let resp = self
            .authorize(self.client.get(format!("{}/", node)))
            .timeout(self.config.connect_timeout)
            .send()
            .await
            .map_err(|source| StoreError::Connection {
                address: node.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
            return Err(StoreError::ConnectionRefused {
                address: node.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        match resp.json::<InfoResponse>().await {
            Ok(InfoResponse { cluster_name, version }) => info!(
                address = node,
                cluster = cluster_name.as_deref().unwrap_or("<unknown>"),
                version = version.as_ref().map(|v| v.number.as_str()).unwrap_or("<unknown>"),
                "connected to Elasticsearch"
            ),
            Err(_) => info!(address = node, "connected to Elasticsearch"),
        }
        Ok(())
    }

    fn node(&self) -> &str {
        let nodes = &self.config.addresses;
        let idx = self.next_node.fetch_add(1, Ordering::Relaxed) % nodes.len();
        nodes[idx].trim_end_matches('/')
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config.username {
            Some(user) => req.basic_auth(user, self.config.password.as_ref()),
            None => req,
        }
    }

    fn request(&self, req: RequestBuilder) -> RequestBuilder {
        let req = self.authorize(req);
        match self.config.request_timeout {
            Some(timeout) => req.timeout(timeout),
            None => req,
        }
    }

    fn collection_url(&self, collection: &str, endpoint: &str) -> String {
        format!(
            "{}/{}/{}",
            self.node(),
            urlencoding::encode(collection),
            endpoint
        )
    }
}

async fn reject(operation: &'static str, collection: &str, resp: Response) -> StoreError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
    StoreError::Rejected {
        operation,
        collection: collection.to_string(),
        status,
        body,
    }
}

#[async_trait]
impl DocumentStore for ElasticClient {
    async fn index_document(&self, collection: &str, document: &Value) -> Result<(), StoreError> {
        let body = serde_json::to_vec(document).map_err(StoreError::Serialization)?;

        // refresh=true trades write latency for read-after-write visibility.
        let url = self.collection_url(collection, "_doc?refresh=true");
        let resp = self
            .request(self.client.post(&url))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(reject("index", collection, resp).await);
        }

        debug!(collection, "document indexed");
        Ok(())
    }

    async fn search(&self, collection: &str, query: &SearchQuery) -> Result<Vec<Document>, StoreError> {
        let mut matcher = Map::new();
        matcher.insert(query.field.clone(), Value::String(query.value.clone()));
        let body = json!({
            "query": { "match": matcher },
            "size": query.limit,
        });

        let url = self.collection_url(collection, "_search");
        let resp = self.request(self.client.post(&url)).json(&body).send().await?;

        if !resp.status().is_success() {
            return Err(reject("search", collection, resp).await);
        }

        let bytes = resp.bytes().await?;
        let parsed: SearchResponse = serde_json::from_slice(&bytes).map_err(StoreError::Decode)?;
        let docs: Vec<Document> = parsed
            .hits
            .hits
            .into_iter()
            .take(query.limit)
            .map(|hit| hit.source)
            .collect();

        debug!(collection, field = %query.field, hits = docs.len(), "search completed");
        Ok(docs)
    }
}
