//! Configuration for the token service

use std::str::FromStr;

use bl_shared::JwtConfig;
use chrono::Duration;
use jsonwebtoken::Algorithm;

use crate::errors::DomainError;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Secret for signing access tokens
    pub access_secret: String,
    /// Secret for signing refresh tokens
    pub refresh_secret: String,
    /// JWT signing algorithm, one of the HMAC family
    pub algorithm: Algorithm,
    /// Default access token lifetime
    pub access_token_ttl: Duration,
    /// Default refresh token lifetime
    pub refresh_token_ttl: Duration,
    /// Value pinned in the `iss` claim
    pub issuer: String,
    /// Value pinned in the `aud` claim
    pub audience: String,
}

impl TokenServiceConfig {
    /// Creates a config with default lifetimes, issuer and audience
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        let defaults = JwtConfig::default();
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            algorithm: Algorithm::HS256,
            access_token_ttl: Duration::seconds(defaults.access_token_expiry),
            refresh_token_ttl: Duration::seconds(defaults.refresh_token_expiry),
            issuer: defaults.issuer,
            audience: defaults.audience,
        }
    }

    /// Builds the service config from the loaded application settings
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, DomainError> {
        let algorithm = Algorithm::from_str(&config.algorithm).map_err(|_| {
            DomainError::Configuration {
                message: format!("unknown JWT algorithm '{}'", config.algorithm),
            }
        })?;

        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(DomainError::Configuration {
                message: format!("JWT algorithm {:?} needs an HMAC secret", algorithm),
            });
        }

        Ok(Self {
            access_secret: config.access_secret.clone(),
            refresh_secret: config.refresh_secret.clone(),
            algorithm,
            access_token_ttl: ttl_from_seconds("access", config.access_token_expiry)?,
            refresh_token_ttl: ttl_from_seconds("refresh", config.refresh_token_expiry)?,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        })
    }

    /// Overrides both default lifetimes
    pub fn with_ttls(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_token_ttl = access;
        self.refresh_token_ttl = refresh;
        self
    }

    /// Overrides issuer and audience
    pub fn with_claims(mut self, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self.audience = audience.into();
        self
    }
}

fn ttl_from_seconds(kind: &str, seconds: i64) -> Result<Duration, DomainError> {
    Duration::try_seconds(seconds).ok_or_else(|| DomainError::Configuration {
        message: format!("{} token lifetime of {} seconds is out of range", kind, seconds),
    })
}
