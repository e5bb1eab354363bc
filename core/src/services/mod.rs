//! Business services containing domain logic and use cases.

pub mod auth;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig, RegisterUser};
pub use token::{TokenService, TokenServiceConfig};
pub use user::UserService;
