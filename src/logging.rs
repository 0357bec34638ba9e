//! Logging setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable that overrides every other filter source.
pub const LOG_ENV: &str = "CERTDESIGNER_LOG";

const DEFAULT_FILTER: &str = "info";

/// Filter directives: `CERTDESIGNER_LOG`, then `configured`, then `info`.
pub fn filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global fmt subscriber. Returns `false` if one was already set.
pub fn init(configured: Option<&str>) -> bool {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter(configured))
        .try_init()
        .is_ok()
}
