//! Configuration Module
//!
//! Centralized configuration for the service, read from environment
//! variables (optionally seeded from a `.env` file by the binary).

use std::time::Duration;

use thiserror::Error;

use crate::database::DatabaseConfig;
use crate::utils::security::{DEFAULT_BCRYPT_COST, MAX_BCRYPT_COST, MIN_BCRYPT_COST};

/// Longest accepted access token lifetime (366 days)
pub const MAX_ACCESS_TOKEN_EXPIRES_HOURS: i64 = 24 * 366;

/// Configuration loading and validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Required environment variable {0} is not set")]
    MissingVar(String),

    /// A value is present but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Environment variable helpers
pub mod env {
    use super::ConfigError;
    use std::env;

    /// Get environment variable as string with default
    pub fn get_string(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get environment variable as u16 with default
    pub fn get_u16(key: &str, default: u16) -> u16 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u32 with default
    pub fn get_u32(key: &str, default: u32) -> u32 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u64 with default
    pub fn get_u64(key: &str, default: u64) -> u64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as i64 with default
    pub fn get_i64(key: &str, default: i64) -> i64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable if it is set and not empty
    pub fn get_optional(key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    /// Get required environment variable
    pub fn get_required(key: &str) -> Result<String, ConfigError> {
        get_optional(key).ok_or_else(|| ConfigError::MissingVar(key.to_string()))
    }
}

/// Application configuration combining all service configurations
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration, absent when no `DATABASE_URL` is set
    pub database: Option<DatabaseSettings>,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Password hashing configuration
    pub password: PasswordConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub access_token_expires_hours: i64,
}

/// Password hashing configuration
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    pub bcrypt_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: env::get_string("SERVER_HOST", "0.0.0.0"),
            port: env::get_u16("SERVER_PORT", 3000),
        }
    }
}

impl ServerConfig {
    /// Address the listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseSettings {
    pub fn from_env() -> Option<Self> {
        let url = env::get_optional("DATABASE_URL")?;

        Some(Self {
            url,
            max_connections: env::get_u32("DB_MAX_CONNECTIONS", 10),
            min_connections: env::get_u32("DB_MIN_CONNECTIONS", 1),
            connect_timeout_seconds: env::get_u64("DB_CONNECT_TIMEOUT", 10),
            idle_timeout_seconds: env::get_u64("DB_IDLE_TIMEOUT", 600),
            max_lifetime_seconds: env::get_u64("DB_MAX_LIFETIME", 3600),
        })
    }

    /// Pool settings for [`DatabaseConfig::create_pool`]
    pub fn connection_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connect_timeout: Duration::from_secs(self.connect_timeout_seconds),
            idle_timeout: Duration::from_secs(self.idle_timeout_seconds),
            max_lifetime: Duration::from_secs(self.max_lifetime_seconds),
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            access_secret: env::get_required("JWT_ACCESS_SECRET")?,
            access_token_expires_hours: env::get_i64("JWT_ACCESS_EXPIRES_HOURS", 1),
        })
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: env::get_u32("BCRYPT_COST", DEFAULT_BCRYPT_COST),
        }
    }
}

impl AppConfig {
    /// Load complete application configuration from environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::default(),
            database: DatabaseSettings::from_env(),
            jwt: JwtConfig::from_env()?,
            password: PasswordConfig::default(),
        })
    }

    /// Validate the complete configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid(
                "Server port must be greater than 0".into(),
            ));
        }

        if let Some(database) = &self.database {
            if database.max_connections == 0 {
                return Err(ConfigError::Invalid(
                    "Database max_connections must be greater than 0".into(),
                ));
            }

            if database.min_connections > database.max_connections {
                return Err(ConfigError::Invalid(
                    "Database min_connections cannot be greater than max_connections".into(),
                ));
            }
        }

        if self.jwt.access_secret.is_empty() {
            return Err(ConfigError::Invalid("JWT access secret cannot be empty".into()));
        }

        if !(1..=MAX_ACCESS_TOKEN_EXPIRES_HOURS).contains(&self.jwt.access_token_expires_hours) {
            return Err(ConfigError::Invalid(format!(
                "JWT_ACCESS_EXPIRES_HOURS must be between 1 and {}",
                MAX_ACCESS_TOKEN_EXPIRES_HOURS
            )));
        }

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.password.bcrypt_cost) {
            return Err(ConfigError::Invalid(format!(
                "BCRYPT_COST must be between {} and {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST
            )));
        }

        Ok(())
    }
}
