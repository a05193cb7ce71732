//! Structured logging setup
//!
//! Level is configurable via RUST_LOG (default: info). Output is plain text
//! unless `[logging] json = true`.

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

pub fn init(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
