//! User repository trait defining the interface for account persistence.
//!
//! The trait is async-first and keeps the store behind the domain boundary.
//! Soft-deleted accounts are invisible to every method except `stats`.

use async_trait::async_trait;

use crate::domain::entities::token::Role;
use crate::domain::entities::user::{NewUser, ProfileUpdate, User, UserQuery, UserStats};
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// # Example
/// ```no_run
/// # use bl_core::repositories::UserRepository;
/// # async fn example(repo: &impl UserRepository) -> Result<(), Box<dyn std::error::Error>> {
/// if let Some(user) = repo.find_by_username("alice").await? {
///     println!("found user {}", user.id);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No live user with that id
    /// * `Err(DomainError)` - Database error occurred
    async fn find_by_id(&self, id: u64) -> Result<Option<User>, DomainError>;

    /// Find a user by login name
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Check if a login name is taken
    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError>;

    /// Insert a new user and return it with its assigned id
    ///
    /// Fails with `AuthError::UserAlreadyExists` when the username is taken.
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Replace the stored password hash
    ///
    /// # Returns
    /// * `Ok(true)` - Hash updated
    /// * `Ok(false)` - User not found
    async fn update_password(&self, id: u64, password_hash: &str) -> Result<bool, DomainError>;

    /// Apply the `Some` fields of `update`
    ///
    /// # Returns
    /// * `Ok(true)` - Row updated
    /// * `Ok(false)` - User not found
    async fn update_profile(&self, id: u64, update: &ProfileUpdate) -> Result<bool, DomainError>;

    /// One page of users ordered by id
    async fn list(&self, query: &UserQuery) -> Result<Vec<User>, DomainError>;

    /// Number of users, optionally with a single role
    async fn count(&self, role: Option<Role>) -> Result<u64, DomainError>;

    /// Account counters; the only method that sees soft-deleted rows
    async fn stats(&self) -> Result<UserStats, DomainError>;

    /// Set the role of a user
    ///
    /// Returns `Ok(false)` when the user is missing or already has `role`.
    async fn update_role(&self, id: u64, role: Role) -> Result<bool, DomainError>;

    /// Mark a user deleted; the username becomes free again
    ///
    /// Returns `Ok(false)` when there is no live user with that id.
    async fn soft_delete(&self, id: u64) -> Result<bool, DomainError>;
}
