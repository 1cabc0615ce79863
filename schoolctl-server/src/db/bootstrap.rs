//! Opt-in schema bootstrap for fresh databases
//!
//! The record tables normally exist already. This only creates them when
//! missing and never alters an existing table.

use sqlx::PgPool;

/// Create the `student` and `teacher` tables if they do not exist.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Bootstrapping record tables...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS student (
            id BIGINT PRIMARY KEY,
            name TEXT NOT NULL,
            roll_number TEXT NOT NULL,
            "class" TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teacher (
            id BIGINT PRIMARY KEY,
            name TEXT NOT NULL,
            subject TEXT NOT NULL,
            "class" TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Record tables ready");
    Ok(())
}
