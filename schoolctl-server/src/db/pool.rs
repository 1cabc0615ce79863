//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Connection settings for the record database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "schooluser".to_string(),
            password: String::new(),
            database: "school".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl DatabaseConfig {
    /// Connection options for sqlx.
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);

        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }
}

/// Create a PostgreSQL connection pool.
///
/// # Errors
///
/// Returns an error if the initial connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DatabaseConfig::default()).await?;
/// ```
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        max_connections = config.max_connections,
        "Connecting to database"
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .connect_with(config.connect_options())
        .await
}

/// Settings for the ignored database tests, taken from the usual `DB_*` vars.
#[cfg(test)]
pub(crate) fn test_config() -> DatabaseConfig {
    let defaults = DatabaseConfig::default();
    DatabaseConfig {
        host: std::env::var("DB_HOST").unwrap_or(defaults.host),
        user: std::env::var("DB_USER").unwrap_or(defaults.user),
        password: std::env::var("DB_PASSWORD").unwrap_or(defaults.password),
        database: std::env::var("DB_NAME").unwrap_or(defaults.database),
        ..defaults
    }
}
