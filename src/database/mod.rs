//! Database Module
//!
//! Database connection management and migrations.

pub mod connection;

// Re-export commonly used types
pub use connection::{DatabaseConfig, DatabasePool};
