//! In-memory user store
//!
//! Used for development without a database and by the test suites.
//! Transactions are serialized: a transaction holds the table lock from
//! `begin` until it is committed, rolled back or dropped, and works on a
//! private copy that replaces the table only on commit.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{RepositoryError, RepositoryResult, UserStore, UserTransaction};
use crate::models::user::{NewUser, User};

#[derive(Debug, Clone, Default)]
struct UserTable {
    users: BTreeMap<i64, User>,
    last_id: i64,
}

/// In-memory implementation of [`UserStore`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    table: Arc<Mutex<UserTable>>,
}

impl InMemoryUserStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given users
    ///
    /// New ids continue after the highest seeded id.
    pub fn with_users(users: Vec<User>) -> Self {
        let mut table = UserTable::default();

        for user in users {
            table.last_id = table.last_id.max(user.id);
            table.users.insert(user.id, user);
        }

        Self {
            table: Arc::new(Mutex::new(table)),
        }
    }

    /// Snapshot of every stored user, deleted ones included
    pub async fn all_users(&self) -> Vec<User> {
        self.table.lock().await.users.values().cloned().collect()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn begin(&self) -> RepositoryResult<Box<dyn UserTransaction>> {
        let guard = Arc::clone(&self.table).lock_owned().await;
        let working = guard.clone();

        Ok(Box::new(InMemoryUserTransaction { guard, working }))
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

struct InMemoryUserTransaction {
    guard: OwnedMutexGuard<UserTable>,
    working: UserTable,
}

#[async_trait]
impl UserTransaction for InMemoryUserTransaction {
    async fn exists_by_email(&mut self, email: &str) -> RepositoryResult<bool> {
        Ok(self.working.users.values().any(|u| u.email == email))
    }

    async fn find_active_by_id(&mut self, id: i64) -> RepositoryResult<Option<User>> {
        Ok(self
            .working
            .users
            .get(&id)
            .filter(|u| u.is_active())
            .cloned())
    }

    async fn insert(&mut self, user: NewUser) -> RepositoryResult<User> {
        if self.working.users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::DuplicateEmail(user.email));
        }

        let id = self.working.last_id + 1;
        let user = user.into_user(id);

        self.working.last_id = id;
        self.working.users.insert(id, user.clone());

        Ok(user)
    }

    async fn save(&mut self, user: &User) -> RepositoryResult<User> {
        let stored = self
            .working
            .users
            .get_mut(&user.id)
            .ok_or(RepositoryError::NotFound(user.id))?;

        stored.name = user.name.clone();
        stored.password = user.password.clone();
        stored.deleted = user.deleted;

        Ok(stored.clone())
    }

    async fn commit(self: Box<Self>) -> RepositoryResult<()> {
        let InMemoryUserTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> RepositoryResult<()> {
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
            password: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = InMemoryUserStore::new();

        let mut tx = store.begin().await.unwrap();
        let first = tx.insert(new_user("ann@x.com")).await.unwrap();
        let second = tx.insert(new_user("bob@x.com")).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(!first.deleted);
        assert_eq!(store.all_users().await.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_email() {
        let store = InMemoryUserStore::new();

        let mut tx = store.begin().await.unwrap();
        tx.insert(new_user("ann@x.com")).await.unwrap();
        let result = tx.insert(new_user("ann@x.com")).await;

        assert!(matches!(result, Err(RepositoryError::DuplicateEmail(email)) if email == "ann@x.com"));
    }

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let store = InMemoryUserStore::new();

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert(new_user("ann@x.com")).await.unwrap();
        }

        assert!(store.all_users().await.is_empty());

        let mut tx = store.begin().await.unwrap();
        assert!(!tx.exists_by_email("ann@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_explicit_rollback_discards_writes() {
        let store = InMemoryUserStore::new();

        let mut tx = store.begin().await.unwrap();
        tx.insert(new_user("ann@x.com")).await.unwrap();
        tx.rollback().await.unwrap();

        assert!(store.all_users().await.is_empty());
    }

    #[tokio::test]
    async fn test_find_active_skips_deleted_but_email_stays_taken() {
        let mut deleted = new_user("gone@x.com").into_user(3);
        deleted.destroy();
        let store = InMemoryUserStore::with_users(vec![deleted]);

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.find_active_by_id(3).await.unwrap(), None);
        assert!(tx.exists_by_email("gone@x.com").await.unwrap());

        let next = tx.insert(new_user("new@x.com")).await.unwrap();
        assert_eq!(next.id, 4);
    }

    #[tokio::test]
    async fn test_save_updates_mutable_fields() {
        let store = InMemoryUserStore::with_users(vec![new_user("ann@x.com").into_user(1)]);

        let mut tx = store.begin().await.unwrap();
        let mut user = tx.find_active_by_id(1).await.unwrap().unwrap();
        user.name = "Ann2".to_string();
        user.destroy();
        let saved = tx.save(&user).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(saved.name, "Ann2");
        assert!(saved.deleted);
        assert_eq!(store.all_users().await, vec![saved]);
    }

    #[tokio::test]
    async fn test_save_unknown_id() {
        let store = InMemoryUserStore::new();
        let ghost = new_user("ghost@x.com").into_user(42);

        let mut tx = store.begin().await.unwrap();
        let result = tx.save(&ghost).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_transactions_are_serialized() {
        let store = InMemoryUserStore::new();

        let mut first = store.begin().await.unwrap();
        first.insert(new_user("ann@x.com")).await.unwrap();

        let contender = store.clone();
        let handle = tokio::spawn(async move {
            let mut tx = contender.begin().await.unwrap();
            let result = tx.insert(new_user("ann@x.com")).await;
            matches!(result, Err(RepositoryError::DuplicateEmail(_)))
        });

        first.commit().await.unwrap();
        assert!(handle.await.unwrap());
    }
}
