//! Main authentication service implementation

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::{NewUser, User};
use crate::errors::{AuthError, DomainResult, ValidationError};
use crate::repositories::UserRepository;
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;
use super::password::{hash_password, verify_password};

/// Input for account registration, already shape-validated by the caller
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
    pub nickname: Option<String>,
}

/// Authentication service for account and session flows
pub struct AuthService<U>
where
    U: UserRepository,
{
    /// User repository for database operations
    user_repository: Arc<U>,
    /// Token service for JWT management
    token_service: Arc<TokenService>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<U> AuthService<U>
where
    U: UserRepository,
{
    /// Create a new authentication service
    pub fn new(
        user_repository: Arc<U>,
        token_service: Arc<TokenService>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            config,
        }
    }

    /// Shared token service, for handlers that need TTLs
    pub fn token_service(&self) -> &Arc<TokenService> {
        &self.token_service
    }

    /// Register a new account and open a session for it
    ///
    /// # Returns
    ///
    /// * `Ok((User, TokenPair))` - The stored user and its first token pair
    /// * `Err(AuthError::UserAlreadyExists)` - Username taken
    pub async fn register(&self, input: RegisterUser) -> DomainResult<(User, TokenPair)> {
        if self
            .user_repository
            .exists_by_username(&input.username)
            .await?
        {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let password_hash = hash_password(&input.password, self.config.bcrypt_cost).await?;
        let user = self
            .user_repository
            .create(NewUser::new(input.username, password_hash, input.nickname))
            .await?;

        let tokens = self.token_service.issue_token_pair(&user.token_payload())?;
        info!(user_id = user.id, "user registered");

        Ok((user, tokens))
    }

    /// Authenticate with username and password
    ///
    /// Unknown users and wrong passwords fail with the same error.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<(User, TokenPair)> {
        let user = match self.user_repository.find_by_username(username).await? {
            Some(user) => user,
            None => {
                warn!(username, "login attempt for unknown user");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !verify_password(password, &user.password_hash).await? {
            warn!(user_id = user.id, "login attempt with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let tokens = self.token_service.issue_token_pair(&user.token_payload())?;
        info!(user_id = user.id, "user logged in");

        Ok((user, tokens))
    }

    /// Exchange a refresh token for a new pair
    ///
    /// Identity comes from the token alone; the user store is not consulted.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        Ok(self.token_service.rotate_token_pair(refresh_token)?)
    }

    /// Load the account behind an authenticated request
    pub async fn current_user(&self, user_id: u64) -> DomainResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    /// Replace the password after checking the old one
    pub async fn change_password(
        &self,
        user_id: u64,
        old_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let user = self.current_user(user_id).await?;

        if !verify_password(old_password, &user.password_hash).await? {
            warn!(user_id, "password change with wrong old password");
            return Err(AuthError::InvalidCredentials.into());
        }
        if old_password == new_password {
            return Err(ValidationError::SamePassword.into());
        }

        let password_hash = hash_password(new_password, self.config.bcrypt_cost).await?;
        if !self
            .user_repository
            .update_password(user_id, &password_hash)
            .await?
        {
            return Err(AuthError::UserNotFound.into());
        }

        info!(user_id, "password changed");
        Ok(())
    }
}
