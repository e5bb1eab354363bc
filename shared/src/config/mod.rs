//! Configuration module with business-specific sub-modules
//!
//! - `auth` - session token and password hashing configuration
//! - `database` - MySQL connection pool configuration
//! - `environment` - environment detection and logging configuration
//! - `server` - HTTP server and CORS configuration
//!
//! Configuration is read once at process start and then passed around as
//! immutable values.

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use auth::{parse_duration, AuthConfig, JwtConfig, RefreshCookieConfig};
pub use database::DatabaseConfig;
pub use environment::{Environment, LoggingConfig};
pub use server::{CorsConfig, ServerConfig};

/// Errors raised while loading configuration at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from a variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_lookup(&lookup);

        Ok(Self {
            environment,
            server: ServerConfig::from_lookup(&lookup),
            database: DatabaseConfig::from_lookup(&lookup),
            auth: AuthConfig::from_lookup(&lookup, environment.is_production())?,
            cors: CorsConfig::from_lookup(&lookup),
            logging: LoggingConfig::for_environment(environment),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_production_uses_secure_cookies() {
        let config = AppConfig::from_lookup(|key| match key {
            "ENVIRONMENT" => Some("production".to_string()),
            "JWT_SECRET" => Some("access-secret".to_string()),
            "REFRESH_TOKEN_SECRET" => Some("refresh-secret".to_string()),
            "SERVER_PORT" => Some("8080".to_string()),
            _ => None,
        })
        .unwrap();

        assert!(config.environment.is_production());
        assert!(config.auth.refresh_cookie.secure);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_app_config_without_secrets_fails() {
        let result = AppConfig::from_lookup(|_| None);
        assert!(matches!(result, Err(ConfigError::Missing("JWT_SECRET"))));
    }
}
