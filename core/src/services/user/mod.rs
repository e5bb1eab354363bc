//! User management service module
//!
//! Profile edits for the account owner and the admin operations on
//! other accounts: listing, statistics, password reset, soft delete and
//! role changes.

mod service;

#[cfg(test)]
mod tests;

pub use service::UserService;
