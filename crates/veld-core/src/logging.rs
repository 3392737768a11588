//! Logging setup based on [`tracing`].

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Filtering defaults to `info` and can be overridden with the standard
/// `RUST_LOG` environment variable. Call once at startup; a second call
/// panics because the global subscriber is already set.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
