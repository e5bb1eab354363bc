//! Account management DTOs

use bl_core::domain::entities::token::Role;
use bl_core::domain::entities::user::{ProfileUpdate, UserPage, UserQuery};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::auth::{validate_password_strength, UserProfile};

/// CJK ideographs, letters, digits and underscore
pub static NICKNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{Han}A-Za-z0-9_]+$").unwrap()
});

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(
        length(min = 1, max = 20, message = "Nickname must be 1-20 characters"),
        regex(path = "NICKNAME_REGEX", message = "Nickname may only contain letters, digits, underscores and Chinese characters")
    )]
    #[serde(default)]
    pub nickname: Option<String>,
    #[validate(url(message = "Avatar must be a valid URL"))]
    #[serde(default)]
    pub avatar: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            nickname: request.nickname,
            avatar: request.avatar,
        }
    }
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

/// Query string of the admin account listing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    #[serde(default = "default_page")]
    pub page: u32,
    #[validate(range(min = 1, max = 100, message = "Page size must be 1-100"))]
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[validate(range(max = 1, message = "Role must be 0 or 1"))]
    pub role: Option<u8>,
}

impl ListUsersQuery {
    /// Domain query; call after `validate`
    pub fn to_query(&self) -> UserQuery {
        UserQuery {
            page: self.page,
            page_size: self.page_size,
            role: self.role.and_then(|r| Role::try_from(r).ok()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(
        length(min = 6, max = 30, message = "Password must be 6-30 characters"),
        custom = "validate_password_strength"
    )]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub users: Vec<UserProfile>,
}

impl From<UserPage> for UserListResponse {
    fn from(page: UserPage) -> Self {
        Self {
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            users: page.users.into_iter().map(UserProfile::from).collect(),
        }
    }
}
