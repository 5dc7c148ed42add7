//! Tracing subscriber setup for the binaries.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install a stderr `fmt` layer filtered by `RUST_LOG`, falling back to
/// `default_directives` (e.g. `"humanizer=info"`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging(default_directives: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
