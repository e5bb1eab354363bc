//! Domain entities representing core business objects.

pub mod token;
pub mod user;

// Re-export commonly used types
pub use token::{Claims, Role, TokenPair, TokenPayload, TokenType};
pub use user::{NewUser, ProfileUpdate, User, UserPage, UserQuery, UserStats};
