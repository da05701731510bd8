use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::elastic::ElasticConfig;
use crate::env::{
    DEFAULT_ELASTIC_ADDRESS, DEFAULT_PORT, ELASTIC_ADDRESS_ENV, ELASTIC_PASSWORD_ENV,
    ELASTIC_REQUEST_TIMEOUT_ENV, ELASTIC_USERNAME_ENV, LOG_FORMAT_ENV, PORT_ENV,
};
use crate::error::ConfigError;
use crate::init::LoggingConfig;

/// Everything the binary needs to start, built from the environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub elastic: ElasticConfig,
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to
    /// defaults for missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port_raw = get(PORT_ENV, DEFAULT_PORT);
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue {
                key: PORT_ENV,
                value: port_raw.clone(),
            })?;

        let addresses = parse_addresses(&get(ELASTIC_ADDRESS_ENV, DEFAULT_ELASTIC_ADDRESS));
        if addresses.is_empty() {
            return Err(ConfigError::EmptyAddressList(ELASTIC_ADDRESS_ENV));
        }

        let request_timeout = match lookup(ELASTIC_REQUEST_TIMEOUT_ENV) {
            Some(raw) if !raw.trim().is_empty() => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: ELASTIC_REQUEST_TIMEOUT_ENV,
                        value: raw.clone(),
                    })?;
                Some(Duration::from_secs(secs))
            }
            _ => None,
        };

        let elastic = ElasticConfig {
            addresses,
            username: non_empty(get(ELASTIC_USERNAME_ENV, "")),
            password: non_empty(get(ELASTIC_PASSWORD_ENV, "")),
            request_timeout,
            ..ElasticConfig::default()
        };

        let logging = LoggingConfig {
            json: get(LOG_FORMAT_ENV, "text").eq_ignore_ascii_case("json"),
            ..LoggingConfig::default()
        };

        Ok(ServiceConfig {
            port,
            elastic,
            logging,
        })
    }

    /// Listen on every interface at the configured port.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

/// Split a comma-separated node list.
///
/// Entries without a scheme get `http://`; trailing slashes are removed.
///
/// Examples:
/// - "http://es1:9200,http://es2:9200"
/// - "localhost:9200"
pub fn parse_addresses(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let lower = s.to_ascii_lowercase();
            let url = if lower.starts_with("http://") || lower.starts_with("https://") {
                s.to_string()
            } else {
                format!("http://{}", s)
            };
            url.trim_end_matches('/').to_string()
        })
        .collect()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
