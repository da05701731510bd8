use std::collections::HashMap;

use log_service::proto::log_service_client::LogServiceClient;
use log_service::proto::LogRequest;

/// Send one log entry to a running service.
///
/// Target address defaults to the local server on the default port and can
/// be overridden with `LOG_SERVICE_ADDR`.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let addr = std::env::var("LOG_SERVICE_ADDR")
        .unwrap_or_else(|_| "http://127.0.0.1:50051".to_string());

    let mut client = LogServiceClient::connect(addr).await?;

    let request = LogRequest {
        level: "error".to_string(),
        message: "disk full".to_string(),
        service: "billing".to_string(),
        host: "h1".to_string(),
        extra: HashMap::from([("retry_count".to_string(), "3".to_string())]),
        ..Default::default()
    };

    let response = client.write_log(request).await?.into_inner();
    if response.success {
        println!("log stored");
    } else {
        println!("log rejected: {}", response.error);
    }
    Ok(())
}
