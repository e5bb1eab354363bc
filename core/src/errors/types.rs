//! Domain-specific error types for session tokens, accounts and validation
//!
//! Messages here are for logs. The presentation layer maps every variant to
//! an HTTP status and a stable error code.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::entities::token::Role;

/// Token issuance and verification errors
///
/// Verification failures are deterministic for a given input, so callers
/// should never retry them. `TokenExpired` is kept apart from `TokenInvalid`
/// so clients can choose between refreshing and re-authenticating.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token payload must carry a subject")]
    PayloadInvalid,

    #[error("Token missing")]
    TokenMissing,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token expired at {expired_at}")]
    TokenExpired { expired_at: DateTime<Utc> },

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Account and authorization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Insufficient permissions")]
    InsufficientPermissions,
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid field {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("New password must differ from the old password")]
    SamePassword,

    #[error("No fields to update")]
    EmptyUpdate,

    #[error("Cannot {action} your own account")]
    SelfAction { action: &'static str },

    #[error("User already has the {role} role")]
    RoleUnchanged { role: Role },
}

impl ValidationError {
    /// Shorthand for a single invalid field
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}
