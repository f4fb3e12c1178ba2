#![forbid(unsafe_code)]

//! Shared test fixtures.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for a test binary.
///
/// Respects `RUST_LOG`; safe to call from every test. Only the first call
/// installs a subscriber, later calls are no-ops.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
