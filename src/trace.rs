//! Diagnostic log initialization.
//!
//! Warnings and fatal errors go to **stderr** through `tracing`; the data
//! log is a plain file the writer owns and the two must never share a
//! stream. Filtering follows `RUST_LOG` when set, defaulting to `info`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the diagnostic subscriber.
///
/// Idempotent: if a global subscriber is already set (as happens when tests
/// call this repeatedly), the call is a no-op.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    // Tolerate "already initialized" - expected in tests.
    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
