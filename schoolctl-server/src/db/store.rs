//! Record store trait and error taxonomy
//!
//! Handlers and the id sequence code only see `dyn RecordStore`, so the
//! Postgres store and the in-memory store are interchangeable.

use async_trait::async_trait;

use crate::models::{NewRecord, Record, RecordKind};

/// Closed set of store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique, foreign-key or check constraint rejected the write
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Pool exhausted or closed, or the connection itself failed
    #[error("store unavailable: {0}")]
    Connectivity(String),

    /// Anything else: malformed query, decode failure, ...
    #[error("query failed: {0}")]
    Query(String),
}

impl StoreError {
    /// Stable label for logs and metrics.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::ConstraintViolation(_) => "constraint_violation",
            Self::Connectivity(_) => "connectivity",
            Self::Query(_) => "query",
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db)
                if db.is_unique_violation()
                    || db.is_foreign_key_violation()
                    || db.is_check_violation() =>
            {
                Self::ConstraintViolation(e.to_string())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Connectivity(e.to_string()),
            _ => Self::Query(e.to_string()),
        }
    }
}

/// Parameterized row access for the record tables.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every row of `kind`, ordered by id.
    async fn list_all(&self, kind: RecordKind) -> Result<Vec<Record>, StoreError>;

    /// Largest id in the table, `None` when it is empty.
    async fn max_id(&self, kind: RecordKind) -> Result<Option<i64>, StoreError>;

    /// Insert `record` under `id`. Duplicate ids fail with `ConstraintViolation`.
    async fn insert(&self, id: i64, record: &NewRecord) -> Result<(), StoreError>;

    /// Remove the row with `id`, returning how many rows matched (0 or 1).
    async fn delete_by_id(&self, kind: RecordKind, id: i64) -> Result<u64, StoreError>;

    /// All ids of `kind` in ascending order.
    async fn ids_ascending(&self, kind: RecordKind) -> Result<Vec<i64>, StoreError>;

    /// Move the row at `old_id` to `new_id`.
    async fn update_id(&self, kind: RecordKind, old_id: i64, new_id: i64)
        -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_are_connectivity() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Connectivity(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolClosed),
            StoreError::Connectivity(_)
        ));
    }

    #[test]
    fn row_not_found_is_query_error() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.kind_label(), "query");
    }
}
