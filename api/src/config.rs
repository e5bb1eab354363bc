//! Startup configuration and logging setup

use bl_shared::{AppConfig, ConfigError, LoggingConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Loads `.env` (if present) and then the process environment
pub fn load_config() -> Result<AppConfig, ConfigError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to read .env file: {}", e);
        }
    }
    AppConfig::from_env()
}

/// Installs the global tracing subscriber
///
/// `RUST_LOG` wins over the per-environment default level.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(logging.colored)
                .with_file(logging.source_location)
                .with_line_number(logging.source_location),
        )
        .init();
}
