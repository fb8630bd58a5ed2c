//! Logging initialization.
//!
//! Logs go to stderr through `tracing-subscriber`, human-readable or as JSON.
//! Stdout stays reserved for dumps and detail lines.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Resolve the filter directive: `--verbose` forces debug, otherwise the
/// configured level is used.
fn level_directive(configured: &str, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        configured.trim().to_lowercase()
    }
}

/// Initialize the logging subsystem.
///
/// The RUST_LOG environment variable overrides `level`.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` section, with CLI overrides.
pub fn init_from_config(config: &glimpse_core::Config, verbose: bool, json_logs: bool) {
    let level = level_directive(&config.logging.level, verbose);
    let json_format = json_logs || config.logging.format == "json";
    init(&level, json_format);
}
