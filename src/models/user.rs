//! User Model
//!
//! Core user entity and the values used to create it.

use serde::Serialize;

/// Stored user record
///
/// `password` always holds an encoded hash, never the plaintext. Records are
/// never removed from storage; `destroy` flips `deleted` and lookups by id
/// skip deleted rows from then on.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Identifier assigned by the store
    pub id: i64,

    /// User's display name
    pub name: String,

    /// User's email address (normalized, unique across all stored users)
    pub email: String,

    /// Encoded password hash
    pub password: String,

    /// Soft-delete flag
    pub deleted: bool,
}

impl User {
    /// Overwrites the mutable profile fields with the ones in `source`
    ///
    /// Only `name` and `password` are copied. `id`, `email` and `deleted`
    /// stay as they are.
    pub fn change_with(&mut self, source: UserChanges) {
        self.name = source.name;
        self.password = source.password;
    }

    /// Marks the user as deleted without touching any other field
    pub fn destroy(&mut self) {
        self.deleted = true;
    }

    /// Whether the record is still visible to lookups by id
    pub fn is_active(&self) -> bool {
        !self.deleted
    }
}

/// Values for a user that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Encoded password hash
    pub password: String,
}

impl NewUser {
    /// Attaches a store-assigned id, producing an active user
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password: self.password,
            deleted: false,
        }
    }
}

/// Replacement values for the mutable fields of a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChanges {
    pub name: String,
    /// Encoded password hash
    pub password: String,
}

/// User representation for external API responses
///
/// Carries no password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResultData {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub deleted: bool,
}

impl From<User> for UserResultData {
    fn from(user: User) -> Self {
        UserResultData {
            id: user.id,
            name: user.name,
            email: user.email,
            deleted: user.deleted,
        }
    }
}
