//! User Account Service Library
//!
//! Registration, authenticated self-service update and soft deletion of user
//! records, backed by PostgreSQL and bcrypt password hashing.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use user_account_service::{UserRegistrationData, UserService};
//! use sqlx::PgPool;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = PgPool::connect("postgres://localhost/user_accounts").await?;
//!     let user_service = UserService::with_pool(pool, bcrypt::DEFAULT_COST);
//!
//!     let user = user_service
//!         .register_user(UserRegistrationData {
//!             name: "Ann".to_string(),
//!             email: "ann@x.com".to_string(),
//!             password: "pw1".to_string(),
//!         })
//!         .await?;
//!
//!     // Only the user themself may change or delete their record
//!     user_service.delete_user(user.id, user.id).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **API Layer**: axum handlers, bearer-token middleware, route builder
//! - **Service Layer**: the three use cases and their business rules
//! - **Repository**: transactional user store (PostgreSQL or in-memory)
//! - **Models**: user entity and request payloads
//! - **Utils**: error types, password encoding, validation

/// HTTP API layer with handlers and configurable routing
pub mod api;

/// Configuration read from the environment
pub mod config;

/// Database connection management and migrations
pub mod database;

/// Data models and request/response structures
pub mod models;

/// Transactional persistence for user records
pub mod repository;

/// Business logic and token validation
pub mod service;

/// Shared utilities for errors, password encoding and validation
pub mod utils;

// Re-export commonly used types for convenient access
pub use api::{create_routes, AppState, RouterBuilder};
pub use config::{AppConfig, ConfigError};
pub use database::{DatabaseConfig, DatabasePool};
pub use models::{
    auth::UserContext,
    requests::{UserModificationData, UserRegistrationData},
    user::{User, UserResultData},
};
pub use repository::{InMemoryUserStore, PgUserStore, RepositoryError, UserStore};
pub use service::{JwtService, UserService, UserServiceError};
pub use utils::error::{AppError, AppResult, ErrorResponse};
pub use utils::security::{BcryptPasswordEncoder, PasswordEncoder};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
