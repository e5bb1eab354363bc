//! Account and session DTOs
//!
//! Bodies are camelCase on the wire. Requests are shape-checked with
//! `validator` before they reach the auth service.

use bl_core::domain::entities::token::{Role, TokenPair};
use bl_core::domain::entities::user::User;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Letters, digits and underscore
pub static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+$").unwrap()
});

/// Passwords rejected regardless of composition
const WEAK_PASSWORDS: &[&str] = &["123456", "password", "qwerty", "123123", "111111"];

/// Requires lower case, upper case and a digit, and refuses known weak values
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if WEAK_PASSWORDS.contains(&password.to_lowercase().as_str()) {
        let mut error = ValidationError::new("weak_password");
        error.message = Some("Password is too common".into());
        return Err(error);
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        let mut error = ValidationError::new("password_strength");
        error.message =
            Some("Password must contain upper case, lower case letters and a digit".into());
        return Err(error);
    }

    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        length(min = 2, max = 20, message = "Username must be 2-20 characters"),
        regex(path = "USERNAME_REGEX", message = "Username may only contain letters, digits and underscores")
    )]
    pub username: String,
    #[validate(
        length(min = 6, max = 30, message = "Password must be 6-30 characters"),
        custom = "validate_password_strength"
    )]
    pub password: String,
    #[validate(length(min = 1, max = 20, message = "Nickname must be 1-20 characters"))]
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Refresh body; the token may come from the cookie instead
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,
    #[validate(
        length(min = 6, max = 30, message = "Password must be 6-30 characters"),
        custom = "validate_password_strength"
    )]
    pub new_password: String,
}

/// Public view of an account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub nickname: String,
    pub avatar: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            nickname: user.nickname,
            avatar: user.avatar,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: u64,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserProfile,
    #[serde(flatten)]
    pub tokens: TokenPair,
}
