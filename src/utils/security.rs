//! Security Utilities
//!
//! Password encoding used by the user service.

use bcrypt::{hash, verify, DEFAULT_COST};

/// Default bcrypt cost for password hashing
pub const DEFAULT_BCRYPT_COST: u32 = DEFAULT_COST;

/// Lowest and highest cost bcrypt accepts
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// One-way transform of a plaintext credential into a storable hash
pub trait PasswordEncoder: Send + Sync {
    /// Encode a plaintext password
    fn encode(&self, raw_password: &str) -> Result<String, bcrypt::BcryptError>;

    /// Check a plaintext password against a previously encoded one
    fn matches(&self, raw_password: &str, encoded: &str) -> Result<bool, bcrypt::BcryptError>;
}

/// bcrypt-backed password encoder
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordEncoder {
    cost: u32,
}

impl BcryptPasswordEncoder {
    /// Create an encoder with a custom bcrypt cost
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordEncoder for BcryptPasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String, bcrypt::BcryptError> {
        hash_password_with_cost(raw_password, self.cost)
    }

    fn matches(&self, raw_password: &str, encoded: &str) -> Result<bool, bcrypt::BcryptError> {
        verify_password(raw_password, encoded)
    }
}

/// Hash a password with custom bcrypt cost
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}
