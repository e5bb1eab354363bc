//! User entity representing a registered blog account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::token::{Role, TokenPayload};

/// User entity representing a registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier, always positive
    pub id: u64,

    /// Unique login name
    pub username: String,

    /// bcrypt hash of the password, never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Display name
    pub nickname: String,

    /// Avatar URL
    pub avatar: Option<String>,

    /// Authorization tier
    pub role: Role,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Identity to embed in session tokens for this user
    pub fn token_payload(&self) -> TokenPayload {
        TokenPayload::new(self.id, self.role).with_username(self.username.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Data required to insert a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub nickname: String,
    pub role: Role,
}

impl NewUser {
    /// Creates a standard account; the nickname falls back to the username
    pub fn new(username: String, password_hash: String, nickname: Option<String>) -> Self {
        let nickname = nickname
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| username.clone());

        Self {
            username,
            password_hash,
            nickname,
            role: Role::User,
        }
    }
}

/// Fields a user may change on their own account
///
/// `None` leaves the stored value as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub nickname: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none() && self.avatar.is_none()
    }
}

/// Window and filter for the admin account listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserQuery {
    /// 1-based page number
    pub page: u32,
    /// Rows per page
    pub page_size: u32,
    /// Only accounts with this role
    pub role: Option<Role>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            role: None,
        }
    }
}

impl UserQuery {
    /// Rows to skip before this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// One page of accounts plus the total matching the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub users: Vec<User>,
}

/// Account counters for the admin dashboard
///
/// `total_users`, `admin_count` and `today_new_users` count live accounts
/// only; "today" is the current UTC date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: u64,
    pub admin_count: u64,
    pub today_new_users: u64,
    pub deleted_users: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            username: "alice".to_string(),
            password_hash: "$2b$10$hash".to_string(),
            nickname: "Alice".to_string(),
            avatar: None,
            role: Role::Admin,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_token_payload() {
        let payload = user().token_payload();

        assert_eq!(payload.subject, 7);
        assert_eq!(payload.role, Role::Admin);
        assert_eq!(payload.username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let json = serde_json::to_value(user()).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["username"], "alice");
        assert_eq!(json["role"], 1);
    }

    #[test]
    fn test_new_user_nickname_defaults_to_username() {
        let new_user = NewUser::new("bob".to_string(), "h".to_string(), None);
        assert_eq!(new_user.nickname, "bob");
        assert_eq!(new_user.role, Role::User);

        let new_user = NewUser::new("bob".to_string(), "h".to_string(), Some("  ".to_string()));
        assert_eq!(new_user.nickname, "bob");

        let new_user = NewUser::new("bob".to_string(), "h".to_string(), Some("Bobby".to_string()));
        assert_eq!(new_user.nickname, "Bobby");
    }

    #[test]
    fn test_profile_update_is_empty() {
        assert!(ProfileUpdate::default().is_empty());
        assert!(!ProfileUpdate {
            avatar: Some("https://img.example.com/a.png".to_string()),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_user_query_offset() {
        assert_eq!(UserQuery::default().offset(), 0);

        let query = UserQuery {
            page: 3,
            page_size: 20,
            role: None,
        };
        assert_eq!(query.offset(), 40);

        let query = UserQuery {
            page: 0,
            ..Default::default()
        };
        assert_eq!(query.offset(), 0);
    }
}
