//! schoolctl CLI - student and teacher records service
//!
//! - `serve`: run the HTTP API (records, health, metrics)
//! - `compact`: renumber a table's ids without going through the API

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "schoolctl",
    author,
    version,
    about = "Student and teacher records with dense sequential ids"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Renumber a record table's ids to 1..=N
    Compact(commands::compact::CompactArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so clap's env fallbacks can see it
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Compact(args) => commands::run_compact(args).await?,
    }

    Ok(())
}
