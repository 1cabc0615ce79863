//! HTTP server command
//!
//! Runs the records API until Ctrl+C/SIGTERM, then drains the pool.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use clap::Parser;

use schoolctl_server::db::{bootstrap, create_pool};
use schoolctl_server::http::{run_server, ServerConfig, DEFAULT_PORT};

use crate::config::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Allow any CORS origin (disable to restrict to localhost)
    #[arg(long, env = "CORS_PERMISSIVE", default_value_t = true, action = clap::ArgAction::Set)]
    pub cors_permissive: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let bind_addr = SocketAddr::new(args.bind, args.port);
    tracing::info!("Starting schoolctl server on {}", bind_addr);

    let pool = create_pool(&args.db.to_config())
        .await
        .context("Failed to create database pool")?;

    if args.db.bootstrap_schema {
        bootstrap::run(&pool)
            .await
            .context("Failed to bootstrap record tables")?;
    }

    let config = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive,
    };

    // Blocks until shutdown
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
