//! Logging setup for the discovery server.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing with a custom default filter.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false))
        .init();
}

/// Lifecycle prefixes for log lines.
pub mod prefix {
    /// Startup
    pub const OPEN: &str = "✿";
    /// Graceful shutdown
    pub const CLOSE: &str = "❀";
}
