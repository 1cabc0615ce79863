//! Database connection flags shared by every subcommand
//!
//! Each flag falls back to an environment variable, and a `.env` file in the
//! working directory is loaded before parsing.

use clap::Args;
use schoolctl_server::db::pool::DEFAULT_MAX_CONNECTIONS;
use schoolctl_server::DatabaseConfig;

#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "DB_USER", default_value = "schooluser")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// Database name
    #[arg(long, env = "DB_NAME", default_value = "school")]
    pub db_name: String,

    /// Maximum pooled connections
    #[arg(long, env = "DB_POOL_SIZE", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub db_pool_size: u32,

    /// Create the student/teacher tables when missing
    #[arg(long)]
    pub bootstrap_schema: bool,
}

impl DatabaseArgs {
    pub fn to_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
            max_connections: self.db_pool_size,
        }
    }
}
