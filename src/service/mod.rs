//! Service Layer
//!
//! Business logic for the user use cases and access token validation.

pub mod jwt;
pub mod user;

// Re-export services
pub use jwt::{JwtService, TokenError};
pub use user::{UserService, UserServiceError, UserServiceResult};
