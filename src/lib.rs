pub mod config;
pub mod error;
pub mod portfolio;
pub mod pricing;
pub mod report;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// RUST_LOG takes precedence over `default_level`. Output goes to stderr so
/// CSV and JSON written to stdout stay machine-readable.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
