//! Account management on top of the user store

use std::sync::Arc;

use tracing::info;

use crate::domain::entities::token::Role;
use crate::domain::entities::user::{ProfileUpdate, User, UserPage, UserQuery, UserStats};
use crate::errors::{AuthError, DomainResult, ValidationError};
use crate::repositories::UserRepository;
use crate::services::auth::{hash_password, AuthServiceConfig};

/// Service for profile edits and admin account operations
///
/// Authorization is the caller's job; methods taking an `actor_id` only
/// use it to refuse actions on the actor's own account.
pub struct UserService<U>
where
    U: UserRepository,
{
    user_repository: Arc<U>,
    config: AuthServiceConfig,
}

impl<U> UserService<U>
where
    U: UserRepository,
{
    pub fn new(user_repository: Arc<U>, config: AuthServiceConfig) -> Self {
        Self {
            user_repository,
            config,
        }
    }

    async fn find(&self, user_id: u64) -> DomainResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    /// Change nickname and/or avatar of a live account
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The account after the update
    /// * `Err(ValidationError::EmptyUpdate)` - Neither field given
    /// * `Err(AuthError::UserNotFound)` - No live account with that id
    pub async fn update_profile(&self, user_id: u64, update: ProfileUpdate) -> DomainResult<User> {
        if update.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }
        if !self.user_repository.update_profile(user_id, &update).await? {
            return Err(AuthError::UserNotFound.into());
        }

        info!(user_id, "profile updated");
        self.find(user_id).await
    }

    /// One page of live accounts plus the filtered total
    pub async fn list_users(&self, query: UserQuery) -> DomainResult<UserPage> {
        let total = self.user_repository.count(query.role).await?;
        let users = self.user_repository.list(&query).await?;

        Ok(UserPage {
            total,
            page: query.page,
            page_size: query.page_size,
            users,
        })
    }

    pub async fn stats(&self) -> DomainResult<UserStats> {
        self.user_repository.stats().await
    }

    /// Set a new password without knowing the old one
    pub async fn reset_password(&self, target_id: u64, new_password: &str) -> DomainResult<()> {
        self.find(target_id).await?;

        let password_hash = hash_password(new_password, self.config.bcrypt_cost).await?;
        if !self
            .user_repository
            .update_password(target_id, &password_hash)
            .await?
        {
            return Err(AuthError::UserNotFound.into());
        }

        info!(user_id = target_id, "password reset by admin");
        Ok(())
    }

    /// Soft-delete another account
    pub async fn delete_user(&self, actor_id: u64, target_id: u64) -> DomainResult<()> {
        if actor_id == target_id {
            return Err(ValidationError::SelfAction { action: "delete" }.into());
        }
        if !self.user_repository.soft_delete(target_id).await? {
            return Err(AuthError::UserNotFound.into());
        }

        info!(actor_id, user_id = target_id, "user deleted");
        Ok(())
    }

    /// Grant the admin role
    pub async fn promote(&self, actor_id: u64, target_id: u64) -> DomainResult<User> {
        self.change_role(actor_id, target_id, Role::Admin, "promote")
            .await
    }

    /// Revoke the admin role
    pub async fn demote(&self, actor_id: u64, target_id: u64) -> DomainResult<User> {
        self.change_role(actor_id, target_id, Role::User, "demote")
            .await
    }

    async fn change_role(
        &self,
        actor_id: u64,
        target_id: u64,
        role: Role,
        action: &'static str,
    ) -> DomainResult<User> {
        if actor_id == target_id {
            return Err(ValidationError::SelfAction { action }.into());
        }

        let target = self.find(target_id).await?;
        if target.role == role {
            return Err(ValidationError::RoleUnchanged { role }.into());
        }
        if !self.user_repository.update_role(target_id, role).await? {
            // Deleted or changed by a concurrent request
            return Err(AuthError::UserNotFound.into());
        }

        info!(actor_id, user_id = target_id, %role, "role changed");
        self.find(target_id).await
    }
}
