//! Token entities for JWT-based session authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TokenError;

/// Authorization tier carried in every token
///
/// Encoded as an integer on the wire (`0` = user, `1` = admin). Ordering
/// follows privilege, so guards compare with `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Role {
    /// Standard account
    #[default]
    User = 0,
    /// Administrator
    Admin = 1,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl TryFrom<u8> for Role {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::User),
            1 => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl From<Role> for u8 {
    fn from(role: Role) -> Self {
        role as u8
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Discriminates the two credential kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// Identity a token is issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    /// User id; `0` means "no subject" and is rejected at issuance
    pub subject: u64,
    pub role: Role,
    /// Display name copied into the token, if known
    pub username: Option<String>,
}

impl TokenPayload {
    pub fn new(subject: u64, role: Role) -> Self {
        Self {
            subject,
            role,
            username: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as a decimal string)
    pub sub: String,

    /// Authorization tier
    pub role: Role,

    /// Username, when the issuer knew it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Credential kind
    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates claims for `payload` valid from now for `ttl`
    ///
    /// A negative `ttl` yields claims that are already expired. Fails with
    /// `TokenGenerationFailed` when `now + ttl` leaves the representable range.
    pub fn new(
        payload: &TokenPayload,
        token_type: TokenType,
        ttl: Duration,
        issuer: &str,
        audience: &str,
    ) -> Result<Self, TokenError> {
        let now = Utc::now();
        let expiry = now
            .checked_add_signed(ttl)
            .ok_or(TokenError::TokenGenerationFailed)?;

        Ok(Self {
            sub: payload.subject.to_string(),
            role: payload.role,
            username: payload.username.clone(),
            token_type,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiry.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Parses the subject back into a user id
    pub fn user_id(&self) -> Result<u64, TokenError> {
        match self.sub.parse::<u64>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(TokenError::TokenInvalid),
        }
    }

    /// Rebuilds the payload these claims were issued for
    pub fn payload(&self) -> Result<TokenPayload, TokenError> {
        Ok(TokenPayload {
            subject: self.user_id()?,
            role: self.role,
            username: self.username.clone(),
        })
    }

    /// Encoded expiry as a timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Checks if the claims have expired; a token dies at its `exp` second
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Checks if the claims are inside their validity window `[nbf, exp)`
    pub fn is_valid(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.nbf && now < self.exp
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Seconds until the access token expires, never negative
    pub expires_in: i64,
}
