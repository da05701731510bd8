use log_service::config::ServiceConfig;
use log_service::elastic::ElasticClient;
use log_service::handler::LOG_COLLECTION;
use log_service::init::init_tracing;
use log_service::store::{DocumentStore, SearchQuery};
use tracing::info;

/// Query stored logs directly through the store client.
///
/// Usage: `cargo run --example search_logs -- service billing`
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServiceConfig::from_env()?;
    init_tracing(&config.logging);

    let mut args = std::env::args().skip(1);
    let field = args.next().unwrap_or_else(|| "service".to_string());
    let value = args.next().unwrap_or_else(|| "billing".to_string());

    let es = ElasticClient::connect(config.elastic).await?;
    let docs = es
        .search(LOG_COLLECTION, &SearchQuery::new(&field, &value, 10))
        .await?;

    info!(%field, %value, hits = docs.len(), "search finished");
    for doc in docs {
        println!("{}", serde_json::to_string(&doc)?);
    }
    Ok(())
}
