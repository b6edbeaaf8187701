//! Helpers for test suites that drive approval runs.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logger for testing (quieter output).
///
/// Honours `RUST_LOG`, defaults to `warn` and writes through the test
/// harness's captured output. Safe to call from every test.
pub fn init_test_logger() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_test_writer())
        .try_init();
}
