//! In-memory implementation of UserRepository for tests and local runs

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::token::Role;
use crate::domain::entities::user::{NewUser, ProfileUpdate, User, UserQuery, UserStats};
use crate::errors::{AuthError, DomainError};

use super::trait_::UserRepository;

#[derive(Default)]
struct MockState {
    users: HashMap<u64, User>,
    deleted: HashMap<u64, User>,
    next_id: u64,
}

impl MockState {
    fn live_mut(&mut self, id: u64) -> Option<&mut User> {
        self.users.get_mut(&id)
    }
}

/// Mock user repository backed by a map
///
/// Soft-deleted users move to a separate map, so lookups and username
/// uniqueness only ever see live accounts.
#[derive(Clone, Default)]
pub struct MockUserRepository {
    state: Arc<RwLock<MockState>>,
}

impl MockUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live users
    pub async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: u64) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.values().any(|u| u.username == username))
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.username == user.username) {
            return Err(AuthError::UserAlreadyExists.into());
        }

        state.next_id += 1;
        let created = User {
            id: state.next_id,
            username: user.username,
            password_hash: user.password_hash,
            nickname: user.nickname,
            avatar: None,
            role: user.role,
            created_at: Utc::now(),
            updated_at: None,
        };

        state.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_password(&self, id: u64, password_hash: &str) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        match state.live_mut(id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_profile(&self, id: u64, update: &ProfileUpdate) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        match state.live_mut(id) {
            Some(user) => {
                if let Some(nickname) = &update.nickname {
                    user.nickname = nickname.clone();
                }
                if let Some(avatar) = &update.avatar {
                    user.avatar = Some(avatar.clone());
                }
                user.updated_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, query: &UserQuery) -> Result<Vec<User>, DomainError> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|u| query.role.map_or(true, |role| u.role == role))
            .cloned()
            .collect();
        users.sort_by_key(|u| u.id);

        Ok(users
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size as usize)
            .collect())
    }

    async fn count(&self, role: Option<Role>) -> Result<u64, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .count() as u64)
    }

    async fn stats(&self) -> Result<UserStats, DomainError> {
        let state = self.state.read().await;
        let today = Utc::now().date_naive();

        Ok(UserStats {
            total_users: state.users.len() as u64,
            admin_count: state.users.values().filter(|u| u.is_admin()).count() as u64,
            today_new_users: state
                .users
                .values()
                .filter(|u| u.created_at.date_naive() == today)
                .count() as u64,
            deleted_users: state.deleted.len() as u64,
        })
    }

    async fn update_role(&self, id: u64, role: Role) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        match state.live_mut(id) {
            Some(user) if user.role != role => {
                user.role = role;
                user.updated_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn soft_delete(&self, id: u64) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        match state.users.remove(&id) {
            Some(user) => {
                state.deleted.insert(id, user);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
