//! One-shot compaction of a record table

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use schoolctl_server::db::{bootstrap, create_pool, PgRecordStore};
use schoolctl_server::metrics::MetricsRegistry;
use schoolctl_server::{RecordKind, RecordService};

use crate::config::DatabaseArgs;

/// Arguments for the compact command
#[derive(Parser, Debug)]
pub struct CompactArgs {
    /// Record table to renumber (student or teacher)
    pub kind: RecordKind,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Renumber a table's ids to 1..=N and report what moved
pub async fn run_compact(args: CompactArgs) -> Result<()> {
    let pool = create_pool(&args.db.to_config())
        .await
        .context("Failed to create database pool")?;

    if args.db.bootstrap_schema {
        bootstrap::run(&pool)
            .await
            .context("Failed to bootstrap record tables")?;
    }

    let service = RecordService::new(
        Arc::new(PgRecordStore::new(pool.clone())),
        Arc::new(MetricsRegistry::new()),
    );
    let result = service.compact(args.kind).await;
    pool.close().await;

    let report = result.with_context(|| format!("Failed to compact {} ids", args.kind))?;
    println!(
        "Compacted {}: {} rows, {} ids moved",
        args.kind, report.rows, report.moved
    );

    Ok(())
}
