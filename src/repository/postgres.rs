//! PostgreSQL user store
//!
//! Each [`UserTransaction`] wraps one sqlx transaction. sqlx rolls a
//! transaction back when it is dropped uncommitted.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::{RepositoryError, RepositoryResult, UserStore, UserTransaction};
use crate::models::user::{NewUser, User};

/// Name of the unique constraint on `users.email`
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// User store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new store with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn begin(&self) -> RepositoryResult<Box<dyn UserTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUserTransaction { tx }))
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

struct PgUserTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UserTransaction for PgUserTransaction {
    async fn exists_by_email(&mut self, email: &str) -> RepositoryResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&mut *self.tx)
                .await?;

        Ok(exists)
    }

    async fn find_active_by_id(&mut self, id: i64) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, deleted
            FROM users
            WHERE id = $1 AND deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(user)
    }

    async fn insert(&mut self, user: NewUser) -> RepositoryResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, deleted)
            VALUES ($1, $2, $3, FALSE)
            RETURNING id, name, email, password, deleted
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.constraint() == Some(EMAIL_CONSTRAINT) => {
                RepositoryError::DuplicateEmail(user.email.clone())
            }
            other => RepositoryError::Database(other),
        })
    }

    async fn save(&mut self, user: &User) -> RepositoryResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, password = $3, deleted = $4
            WHERE id = $1
            RETURNING id, name, email, password, deleted
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.password)
        .bind(user.deleted)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or(RepositoryError::NotFound(user.id))
    }

    async fn commit(self: Box<Self>) -> RepositoryResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> RepositoryResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ann".to_string(),
            email: email.to_string(),
            password: "$2b$04$hash".to_string(),
        }
    }

    #[sqlx::test]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_insert_and_find(pool: PgPool) {
        let store = PgUserStore::new(pool);

        let mut tx = store.begin().await.unwrap();
        let user = tx.insert(new_user("ann@x.com")).await.unwrap();
        tx.commit().await.unwrap();

        assert!(user.id > 0);
        assert!(!user.deleted);

        let mut tx = store.begin().await.unwrap();
        let found = tx.find_active_by_id(user.id).await.unwrap();
        assert_eq!(found, Some(user));
        assert!(tx.exists_by_email("ann@x.com").await.unwrap());
        assert!(!tx.exists_by_email("bob@x.com").await.unwrap());
    }

    #[sqlx::test]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_duplicate_email_maps_to_repository_error(pool: PgPool) {
        let store = PgUserStore::new(pool);

        let mut tx = store.begin().await.unwrap();
        tx.insert(new_user("ann@x.com")).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let result = tx.insert(new_user("ann@x.com")).await;
        assert!(matches!(result, Err(RepositoryError::DuplicateEmail(email)) if email == "ann@x.com"));
    }

    #[sqlx::test]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_deleted_user_hidden_but_email_still_taken(pool: PgPool) {
        let store = PgUserStore::new(pool);

        let mut tx = store.begin().await.unwrap();
        let mut user = tx.insert(new_user("ann@x.com")).await.unwrap();
        user.destroy();
        let saved = tx.save(&user).await.unwrap();
        tx.commit().await.unwrap();
        assert!(saved.deleted);

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.find_active_by_id(user.id).await.unwrap(), None);
        assert!(tx.exists_by_email("ann@x.com").await.unwrap());
    }

    #[sqlx::test]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_uncommitted_insert_is_rolled_back(pool: PgPool) {
        let store = PgUserStore::new(pool);

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert(new_user("ann@x.com")).await.unwrap();
        }

        let mut tx = store.begin().await.unwrap();
        assert!(!tx.exists_by_email("ann@x.com").await.unwrap());
    }

    #[sqlx::test]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_save_unknown_id(pool: PgPool) {
        let store = PgUserStore::new(pool);
        let ghost = new_user("ghost@x.com").into_user(9999);

        let mut tx = store.begin().await.unwrap();
        let result = tx.save(&ghost).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(9999))));
    }
}
