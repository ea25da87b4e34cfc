//! Data Models Module
//!
//! User entity, request payloads and authentication types used throughout
//! the service.

pub mod auth;
pub mod requests;
pub mod user;

// Re-export commonly used types
pub use auth::*;
pub use requests::*;
pub use user::*;
