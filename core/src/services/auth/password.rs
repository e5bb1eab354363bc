//! bcrypt helpers run on the blocking thread pool

use crate::errors::DomainError;

/// Hashes `password` with the given work factor
pub async fn hash_password(password: &str, cost: u32) -> Result<String, DomainError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("password hashing task failed: {}", e),
        })?
        .map_err(|e| DomainError::Internal {
            message: format!("password hashing failed: {}", e),
        })
}

/// Checks `password` against a stored bcrypt hash
///
/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, DomainError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("password verification task failed: {}", e),
        })
}
