//! PostgreSQL pool setup
//!
//! Builds the sqlx pool the user store runs on and applies the schema in
//! `migrations/` before the server accepts requests.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Connection pool shared by every user store transaction
pub type DatabasePool = PgPool;

/// Pool sizing and timeouts
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Upper bound on waiting for a free connection
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/user_accounts".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(3600),
        }
    }
}

impl DatabaseConfig {
    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
    }

    /// Open the pool
    pub async fn create_pool(&self) -> Result<DatabasePool, sqlx::Error> {
        let pool = self.pool_options().connect(&self.url).await?;

        log::info!(
            "Connected to PostgreSQL (pool {}..={})",
            self.min_connections,
            self.max_connections
        );

        Ok(pool)
    }

    /// Bring the `users` table up to the bundled schema
    pub async fn run_migrations(pool: &DatabasePool) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.idle_timeout, Duration::from_secs(600));
    }

    #[tokio::test]
    async fn test_create_pool_rejects_malformed_url() {
        let config = DatabaseConfig {
            url: "not-a-database-url".to_string(),
            ..DatabaseConfig::default()
        };

        assert!(config.create_pool().await.is_err());
    }
}
