use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins when set; otherwise debug builds log at DEBUG and release builds
/// at INFO. Logs go to stderr so stdout stays free for JSON output.
pub fn setup_logging() {
    let default = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::debug!("Logging initialized (default level: {})", default);
}
