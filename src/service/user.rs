//! User Service Implementation
//!
//! Registration, self-service update and soft deletion of users. Each
//! operation runs inside one store transaction which is committed on
//! success and rolled back (dropped) on every error path.

use std::sync::Arc;
use thiserror::Error;
use validator::Validate;

use crate::models::{
    requests::{UserModificationData, UserRegistrationData},
    user::{NewUser, User, UserChanges},
};
use crate::repository::{PgUserStore, RepositoryError, UserStore, UserTransaction};
use crate::utils::{
    error::AppError,
    security::{BcryptPasswordEncoder, PasswordEncoder},
    validation::{describe_errors, normalize_email},
};

/// Custom error types for the user service
#[derive(Error, Debug)]
pub enum UserServiceError {
    /// A user with this email is already stored
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    /// No active user has the target id
    #[error("User not found: {0}")]
    NotFound(i64),

    /// The authenticated user is not the target user
    #[error("User {0} does not match the authenticated user")]
    IdentityMismatch(i64),

    /// Input validation failed with detailed error message
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persistence operation failed
    #[error("Repository error: {0}")]
    Repository(RepositoryError),

    /// Password hashing operation failed
    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
}

impl From<RepositoryError> for UserServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateEmail(email) => UserServiceError::DuplicateEmail(email),
            RepositoryError::NotFound(id) => UserServiceError::NotFound(id),
            other => UserServiceError::Repository(other),
        }
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::DuplicateEmail(email) => {
                AppError::Conflict(format!("Email already exists: {}", email))
            }
            UserServiceError::NotFound(id) => AppError::NotFound(format!("User not found: {}", id)),
            UserServiceError::IdentityMismatch(id) => {
                AppError::Forbidden(format!("Not allowed to modify user {}", id))
            }
            UserServiceError::Validation(msg) => AppError::Validation(msg),
            UserServiceError::Repository(RepositoryError::Database(e)) => AppError::Database(e),
            UserServiceError::Repository(e) => AppError::Internal(e.to_string()),
            UserServiceError::Hashing(e) => AppError::HashingError(e),
        }
    }
}

/// Result type for user service operations
pub type UserServiceResult<T> = Result<T, UserServiceError>;

/// Core user service coordinating the user store and the password encoder
#[derive(Clone)]
pub struct UserService {
    /// Source of per-operation transactions
    store: Arc<dyn UserStore>,

    /// One-way password transform
    password_encoder: Arc<dyn PasswordEncoder>,
}

impl UserService {
    /// Creates a service over any store and password encoder
    pub fn new(store: Arc<dyn UserStore>, password_encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self {
            store,
            password_encoder,
        }
    }

    /// Creates a PostgreSQL-backed service using bcrypt with the given cost
    pub fn with_pool(pool: sqlx::PgPool, bcrypt_cost: u32) -> Self {
        Self::new(
            Arc::new(PgUserStore::new(pool)),
            Arc::new(BcryptPasswordEncoder::new(bcrypt_cost)),
        )
    }

    /// Registers a new user
    ///
    /// The email must not belong to any stored user, including deleted ones.
    pub async fn register_user(
        &self,
        registration_data: UserRegistrationData,
    ) -> UserServiceResult<User> {
        registration_data
            .validate()
            .map_err(|e| UserServiceError::Validation(describe_errors(&e)))?;

        let email = normalize_email(&registration_data.email);

        let mut tx = self.store.begin().await?;

        if tx.exists_by_email(&email).await? {
            log::warn!("Registration rejected, email already in use: {}", email);
            return Err(UserServiceError::DuplicateEmail(email));
        }

        let user = NewUser {
            name: registration_data.name,
            email,
            password: self.password_encoder.encode(&registration_data.password)?,
        };

        let user = tx.insert(user).await?;
        tx.commit().await?;

        log::info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Replaces the name and password of the authenticated user
    pub async fn update_user(
        &self,
        authenticated_id: i64,
        id: i64,
        modification_data: UserModificationData,
    ) -> UserServiceResult<User> {
        check_authenticate(authenticated_id, id)?;

        modification_data
            .validate()
            .map_err(|e| UserServiceError::Validation(describe_errors(&e)))?;

        let mut tx = self.store.begin().await?;
        let mut user = find_user(tx.as_mut(), id).await?;

        let source = UserChanges {
            name: modification_data.name,
            password: self.password_encoder.encode(&modification_data.password)?,
        };
        user.change_with(source);

        let user = tx.save(&user).await?;
        tx.commit().await?;

        log::info!("Updated user {}", user.id);
        Ok(user)
    }

    /// Soft-deletes the authenticated user
    ///
    /// A user that is already deleted is not found, so deleting twice fails.
    pub async fn delete_user(&self, authenticated_id: i64, id: i64) -> UserServiceResult<User> {
        check_authenticate(authenticated_id, id)?;

        let mut tx = self.store.begin().await?;
        let mut user = find_user(tx.as_mut(), id).await?;

        user.destroy();

        let user = tx.save(&user).await?;
        tx.commit().await?;

        log::info!("Deleted user {}", user.id);
        Ok(user)
    }

    /// Checks that the backing store is reachable
    pub async fn health_check(&self) -> UserServiceResult<()> {
        self.store.ping().await?;
        Ok(())
    }
}

async fn find_user(tx: &mut dyn UserTransaction, id: i64) -> UserServiceResult<User> {
    tx.find_active_by_id(id)
        .await?
        .ok_or(UserServiceError::NotFound(id))
}

fn check_authenticate(authenticated_id: i64, id: i64) -> UserServiceResult<()> {
    if authenticated_id != id {
        log::warn!("User {} attempted to modify user {}", authenticated_id, id);
        return Err(UserServiceError::IdentityMismatch(id));
    }
    Ok(())
}
