//! Logging setup

use tracing_subscriber::EnvFilter;

/// Level used when neither the command line nor the configuration sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Install the fmt subscriber, writing to stderr so snapshots on stdout stay clean.
///
/// `RUST_LOG` wins over `level` when set.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
