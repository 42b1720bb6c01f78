//! Logging setup for the CLI.
//!
//! Stdout carries protocol responses, so every log line goes to stderr.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global subscriber.
///
/// `RUST_LOG` sets the filter (default `info`), e.g. `RUST_LOG=draw_core=debug`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .init();
}
