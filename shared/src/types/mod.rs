//! Type definitions shared by the API and domain layers
//!
//! - `response` - API response wrappers

pub mod response;

pub use response::ApiResponse;
