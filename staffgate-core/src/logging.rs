//! Logging setup
//!
//! One `tracing-subscriber` initialization shared by the binaries. Libraries
//! only emit; they never install a subscriber.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. `default_filter` applies when
/// `RUST_LOG` is unset, e.g. `"staffgate=debug,tower_http=info"`.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
