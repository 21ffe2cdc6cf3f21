//! Structured logging for harness binaries

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset. Kept at `warn` so test output stays readable.
pub const DEFAULT_FILTER: &str = "warn";

/// Initialize structured logging to stderr with an env-based filter.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with_writer(std::io::stderr)
        .try_init();
}
