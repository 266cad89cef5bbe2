//! Diagnostic logging to stderr.

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured filter
pub const LOG_ENV: &str = "TD_LOG";

/// Pick the filter directive: `TD_LOG` when set and valid, otherwise the
/// configured one, otherwise `warn`.
pub fn env_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or("warn")))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are no-ops.
pub fn init(configured: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(configured))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
