use std::net::SocketAddr;

/// Errors produced by a [`DocumentStore`](crate::store::DocumentStore).
///
/// Nothing here is retried; each variant carries enough detail to be
/// reported back to the caller as-is.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("no document store addresses configured")]
    NoAddresses,

    #[error("failed to connect to document store at {address}: {source}")]
    Connection {
        address: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("document store at {address} refused connection with status {status}: {body}")]
    ConnectionRefused {
        address: String,
        status: u16,
        body: String,
    },

    #[error("failed to encode document: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("failed to decode document store response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("document store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{operation} on {collection} failed with status {status}: {body}")]
    Rejected {
        operation: &'static str,
        collection: String,
        status: u16,
        body: String,
    },
}

/// Invalid configuration read from the environment.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("{0} does not contain any address")]
    EmptyAddressList(&'static str),
}

/// Fatal errors raised while starting or running the server.
#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("document store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("failed to listen on {addr}: {source}")]
    Listen {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read listener address: {0}")]
    LocalAddr(#[source] std::io::Error),

    #[error("gRPC server failed: {0}")]
    Serve(#[from] tonic::transport::Error),
}
