use log_service::config::ServiceConfig;
use log_service::init::{init_default_tracing, init_tracing};
use log_service::server;
use tracing::error;

#[tokio::main]
async fn main() {
    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_default_tracing();
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging);

    if let Err(e) = server::run(config).await {
        error!(error = %e, "log service failed");
        std::process::exit(1);
    }
}
