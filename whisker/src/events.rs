//! Tracing initialization for the whisker binary.

use tracing_subscriber::EnvFilter;

/// The environment variable holding the tracing filter directives.
const LOG_ENV_VAR: &str = "WHISKER_LOG";

/// Initializes tracing: events go to stderr, filtered by `WHISKER_LOG`
/// (`error` by default). Safe to call more than once; later calls are
/// no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new("error"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
