use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::proto::LogRequest;

/// Scalar value allowed in [`LogEntry::extra`].
///
/// Serialized untagged, so the stored document holds plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// Canonical document persisted for every accepted submission.
///
/// Optional fields are skipped on serialization when absent so the stored
/// document never carries empty placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: String,
    pub message: String,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<BTreeMap<String, ExtraValue>>,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Build an entry from a wire submission.
    ///
    /// `timestamp` is always the receipt time chosen by the server. Empty
    /// optional strings and an empty `extra` map are treated as absent.
    pub fn from_request(request: LogRequest, timestamp: DateTime<Utc>) -> Self {
        let extra = if request.extra.is_empty() {
            None
        } else {
            Some(
                request
                    .extra
                    .into_iter()
                    .map(|(k, v)| (k, ExtraValue::String(v)))
                    .collect(),
            )
        };

        LogEntry {
            level: request.level,
            message: request.message,
            service: request.service,
            module: non_empty(request.module),
            request_id: non_empty(request.request_id),
            user_id: non_empty(request.user_id),
            host: non_empty(request.host),
            error: non_empty(request.error),
            extra,
            timestamp,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
