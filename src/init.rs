use crate::env::env_or;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Configuration of the process-wide log output.
///
/// **Fields**
/// - `default_filter`: `EnvFilter` directives used when `RUST_LOG` is not
///   set.
/// - `json`: if `true`, events are printed as JSON lines instead of the
///   human-readable `fmt` format.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub default_filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            json: false,
        }
    }
}

/// Install the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to
/// `config.default_filter`. Calling this more than once is harmless; only
/// the first call installs a subscriber.
pub fn init_tracing(config: &LoggingConfig) {
    let directives = env_or("RUST_LOG", &config.default_filter);
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("info"));

    // The two branches produce different layer types, so the subscriber is
    // assembled twice.
    if config.json {
        let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(false);
        let _ = Registry::default().with(filter).with(fmt_layer).try_init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let _ = Registry::default().with(filter).with(fmt_layer).try_init();
    }
}

/// Initialize logging with [`LoggingConfig::default`].
pub fn init_default_tracing() {
    init_tracing(&LoggingConfig::default());
}
