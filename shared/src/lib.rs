//! Shared configuration and common types for the blog server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded once at startup
//! - Error response structures
//! - Success response envelopes

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    LoggingConfig, RefreshCookieConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::ApiResponse;
