//! Environment variable names read by the service binary.
//!
//! These are purely helpers; the store client and handler take typed
//! configuration and never touch the environment themselves.

/// Comma-separated Elasticsearch node URLs, e.g. `http://127.0.0.1:9200`.
pub const ELASTIC_ADDRESS_ENV: &str = "ELASTIC_ADDRESS";

/// Optional basic-auth user name. Empty means unauthenticated.
pub const ELASTIC_USERNAME_ENV: &str = "ELASTIC_USERNAME";

/// Optional basic-auth password.
pub const ELASTIC_PASSWORD_ENV: &str = "ELASTIC_PASSWORD";

/// Optional timeout in seconds for index and search requests.
pub const ELASTIC_REQUEST_TIMEOUT_ENV: &str = "ELASTIC_REQUEST_TIMEOUT_SECS";

/// gRPC listen port.
pub const PORT_ENV: &str = "PORT";

/// `json` switches log output to JSON lines; anything else is plain text.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_ELASTIC_ADDRESS: &str = "http://localhost:9200";
pub const DEFAULT_PORT: &str = "50051";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
