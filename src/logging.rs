//! Tracing subscriber setup shared by all binaries.

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber honoring `RUST_LOG`, falling back to `default_level`.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();

    if result.is_err() {
        tracing::debug!("Global tracing subscriber already initialized");
    }
}

/// Like [`init_logging`] but writes to stderr, for processes that own stdout.
pub fn init_stderr_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
