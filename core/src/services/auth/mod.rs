//! Authentication service module
//!
//! Account flows built on the user store and the token service:
//! - Registration and login with bcrypt password hashes
//! - Refresh token rotation
//! - Current-user lookup and password change

mod config;
mod password;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use password::{hash_password, verify_password};
pub use service::{AuthService, RegisterUser};
