//! User Repository
//!
//! Persistence abstraction for user records. Every service operation opens
//! one [`UserTransaction`] from a [`UserStore`], runs all of its reads and
//! writes on it, and commits at the end. A transaction dropped without
//! `commit` is rolled back, so an early `?` return never leaves partial
//! writes behind.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::user::{NewUser, User};

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

/// Errors raised by user store implementations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Insert collided with an existing email
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    /// Save targeted an id the store does not hold
    #[error("User {0} does not exist")]
    NotFound(i64),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Source of user transactions
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Opens a new transaction
    async fn begin(&self) -> RepositoryResult<Box<dyn UserTransaction>>;

    /// Round-trips the backing store
    async fn ping(&self) -> RepositoryResult<()>;
}

/// One unit of work against the user table
#[async_trait]
pub trait UserTransaction: Send {
    /// Whether any stored user, deleted or not, has this email
    async fn exists_by_email(&mut self, email: &str) -> RepositoryResult<bool>;

    /// Looks up a user by id, skipping deleted records
    async fn find_active_by_id(&mut self, id: i64) -> RepositoryResult<Option<User>>;

    /// Stores a new user and returns it with its assigned id
    async fn insert(&mut self, user: NewUser) -> RepositoryResult<User>;

    /// Writes the mutable fields of an existing user back to the store
    async fn save(&mut self, user: &User) -> RepositoryResult<User>;

    /// Makes every write of this transaction durable
    async fn commit(self: Box<Self>) -> RepositoryResult<()>;

    /// Discards every write of this transaction
    async fn rollback(self: Box<Self>) -> RepositoryResult<()>;
}
