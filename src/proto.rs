//! Wire messages and gRPC stubs for the `log.LogService` service.
//!
//! The message layout matches `proto/log.proto`; the server and client
//! modules are generated by `build.rs`.

use std::collections::HashMap;

/// A log submission as sent by a caller.
///
/// Every string field is a proto3 scalar, so an unset field arrives as an
/// empty string.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LogRequest {
    #[prost(string, tag = "1")]
    pub level: String,
    #[prost(string, tag = "2")]
    pub message: String,
    #[prost(string, tag = "3")]
    pub service: String,
    #[prost(string, tag = "4")]
    pub module: String,
    #[prost(string, tag = "5")]
    pub request_id: String,
    #[prost(string, tag = "6")]
    pub user_id: String,
    #[prost(string, tag = "7")]
    pub host: String,
    #[prost(string, tag = "8")]
    pub error: String,
    #[prost(map = "string, string", tag = "9")]
    pub extra: HashMap<String, String>,
}

/// Outcome of a single submission.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LogResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
    /// Empty on success.
    #[prost(string, tag = "2")]
    pub error: String,
}

impl LogResponse {
    pub fn ok() -> Self {
        LogResponse {
            success: true,
            error: String::new(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        LogResponse {
            success: false,
            error: error.into(),
        }
    }
}

#[allow(clippy::all, missing_docs)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/log.LogService.rs"));
}

pub use generated::log_service_client;
pub use generated::log_service_server;
