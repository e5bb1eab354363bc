//! Token service module for JWT management
//!
//! This module handles all session-token operations:
//! - Access and refresh token issuance with separate secrets
//! - Verification with type, issuer, audience and time-window checks
//! - Stateless rotation of refresh tokens into fresh pairs

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::TokenService;
