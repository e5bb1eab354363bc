//! Authentication and session token configuration

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// JWT authentication configuration
///
/// Access and refresh tokens are signed with separate secrets so that a
/// credential of one kind never verifies on the other kind's path.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret used to sign access tokens
    pub access_secret: String,

    /// Secret used to sign refresh tokens (must differ from `access_secret`)
    pub refresh_secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// Algorithm for JWT signing (default: HS256)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(),
            refresh_secret: String::new(),
            access_token_expiry: 3600,     // 1 hour
            refresh_token_expiry: 604800,  // 7 days
            issuer: default_issuer(),
            audience: default_audience(),
            algorithm: default_algorithm(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with both signing secrets
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Set issuer and audience claims
    pub fn with_claims(mut self, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self.audience = audience.into();
        self
    }

    /// Checks the invariants the token service relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.refresh_secret.is_empty() {
            return Err(ConfigError::Missing("REFRESH_TOKEN_SECRET"));
        }
        if self.access_secret == self.refresh_secret {
            return Err(ConfigError::Invalid {
                key: "REFRESH_TOKEN_SECRET",
                message: "must differ from JWT_SECRET".to_string(),
            });
        }
        check_lifetime("ACCESS_TOKEN_EXPIRES", self.access_token_expiry)?;
        check_lifetime("REFRESH_TOKEN_EXPIRES", self.refresh_token_expiry)?;
        Ok(())
    }

    /// Build from a variable lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token_expiry = match lookup("ACCESS_TOKEN_EXPIRES") {
            Some(raw) => parse_duration("ACCESS_TOKEN_EXPIRES", &raw)?,
            None => 3600,
        };
        let refresh_token_expiry = match lookup("REFRESH_TOKEN_EXPIRES") {
            Some(raw) => parse_duration("REFRESH_TOKEN_EXPIRES", &raw)?,
            None => 604800,
        };

        let config = Self {
            access_secret: lookup("JWT_SECRET").unwrap_or_default(),
            refresh_secret: lookup("REFRESH_TOKEN_SECRET").unwrap_or_default(),
            access_token_expiry,
            refresh_token_expiry,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(default_issuer),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(default_audience),
            algorithm: default_algorithm(),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Refresh token cookie transport settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefreshCookieConfig {
    /// Whether login/refresh responses also set the refresh cookie
    pub enabled: bool,

    /// Cookie name
    pub name: String,

    /// Cookie path
    pub path: String,

    /// Secure flag (HTTPS only), on in production
    pub secure: bool,
}

impl Default for RefreshCookieConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            name: String::from("refreshToken"),
            path: String::from("/api/user"),
            secure: false,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Refresh cookie configuration
    #[serde(default)]
    pub refresh_cookie: RefreshCookieConfig,

    /// bcrypt work factor for password hashes
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env(secure_cookies: bool) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), secure_cookies)
    }

    /// Build from a variable lookup
    pub fn from_lookup<F>(lookup: F, secure_cookies: bool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt = JwtConfig::from_lookup(&lookup)?;
        let enabled = lookup("REFRESH_COOKIE_ENABLED")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let bcrypt_cost = lookup("BCRYPT_COST")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_bcrypt_cost);

        Ok(Self {
            jwt,
            refresh_cookie: RefreshCookieConfig {
                enabled,
                secure: secure_cookies,
                ..Default::default()
            },
            bcrypt_cost,
        })
    }
}

/// Upper bound for any token lifetime: ten years
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 10 * 365 * 86400;

fn check_lifetime(key: &'static str, seconds: i64) -> Result<(), ConfigError> {
    if seconds <= 0 || seconds > MAX_TOKEN_LIFETIME_SECS {
        return Err(ConfigError::Invalid {
            key,
            message: format!(
                "lifetime must be between 1 and {} seconds, got {}",
                MAX_TOKEN_LIFETIME_SECS, seconds
            ),
        });
    }
    Ok(())
}

/// Parses a lifetime such as `"15m"`, `"1h"`, `"7d"`, `"30s"` or `"3600"`
/// into seconds.
pub fn parse_duration(key: &'static str, raw: &str) -> Result<i64, ConfigError> {
    let raw = raw.trim();
    let invalid = || ConfigError::Invalid {
        key,
        message: format!("invalid duration '{}'", raw),
    };

    let split = raw
        .find(|c: char| !c.is_ascii_digit() && c != '-')
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let value: i64 = digits.parse().map_err(|_| invalid())?;

    let multiplier = match unit {
        "" | "s" => 1,
        "m" => 60,
        "h" => 3600,
        "d" => 86400,
        _ => return Err(invalid()),
    };

    value.checked_mul(multiplier).ok_or_else(invalid)
}

fn default_algorithm() -> String {
    String::from("HS256")
}

fn default_issuer() -> String {
    String::from("blog-server")
}

fn default_audience() -> String {
    String::from("blog-client")
}

fn default_bcrypt_cost() -> u32 {
    10
}
