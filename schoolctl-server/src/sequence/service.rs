//! Record lifecycle: list, create with the next dense id, delete + compact

use std::future::Future;
use std::sync::Arc;

use tracing::Instrument;

use crate::db::{RecordStore, StoreError};
use crate::metrics::MetricsRegistry;
use crate::models::{NewRecord, Record, RecordId, RecordKind};

use super::allocator::next_id;
use super::compactor::{compact, CompactionReport};
use super::locks::TableLocks;

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Rows matched by the delete (0 when the id did not exist)
    pub removed: u64,
    pub compaction: CompactionReport,
}

/// Composes the store, allocator and compactor under per-table locks.
#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn RecordStore>,
    locks: Arc<TableLocks>,
    metrics: Arc<MetricsRegistry>,
}

impl RecordService {
    pub fn new(store: Arc<dyn RecordStore>, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            store,
            locks: Arc::new(TableLocks::new()),
            metrics,
        }
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// All rows of `kind`. Reads take no lock.
    pub async fn list(&self, kind: RecordKind) -> Result<Vec<Record>, StoreError> {
        self.store
            .list_all(kind)
            .await
            .inspect_err(|e| self.metrics.record_store_error(e))
    }

    /// Insert `record` under the next id of its table and return that id.
    pub async fn create(&self, record: NewRecord) -> Result<i64, StoreError> {
        let service = self.clone();
        run_to_completion(async move { service.create_locked(record).await }).await
    }

    /// Delete `id` from `kind`, then compact the table.
    ///
    /// Compaction runs even when no row matched. Once started, the pair runs
    /// to the end even if the caller goes away.
    pub async fn delete(&self, kind: RecordKind, id: RecordId) -> Result<DeleteOutcome, StoreError> {
        let service = self.clone();
        run_to_completion(async move { service.delete_locked(kind, id).await }).await
    }

    /// Compact `kind` without deleting anything.
    pub async fn compact(&self, kind: RecordKind) -> Result<CompactionReport, StoreError> {
        let service = self.clone();
        run_to_completion(async move { service.compact_locked(kind).await }).await
    }

    async fn create_locked(&self, record: NewRecord) -> Result<i64, StoreError> {
        let kind = record.kind();
        let _guard = self.locks.lock(kind).await;

        let id = async {
            let id = next_id(self.store.as_ref(), kind).await?;
            self.store.insert(id, &record).await?;
            Ok::<_, StoreError>(id)
        }
        .await
        .inspect_err(|e| self.metrics.record_store_error(e))?;

        self.metrics.record_created(kind);
        tracing::info!(kind = %kind, id, "Record created");
        Ok(id)
    }

    async fn delete_locked(&self, kind: RecordKind, id: RecordId) -> Result<DeleteOutcome, StoreError> {
        let _guard = self.locks.lock(kind).await;

        let outcome = async {
            let removed = self.store.delete_by_id(kind, id.get()).await?;
            let compaction = compact(self.store.as_ref(), kind).await?;
            Ok::<_, StoreError>(DeleteOutcome { removed, compaction })
        }
        .await
        .inspect_err(|e| self.metrics.record_store_error(e))?;

        self.metrics.record_deleted(kind, outcome.removed);
        self.metrics
            .record_compaction(kind, outcome.compaction.rows, outcome.compaction.moved);
        tracing::info!(
            kind = %kind,
            id = id.get(),
            removed = outcome.removed,
            rows = outcome.compaction.rows,
            moved = outcome.compaction.moved,
            "Record deleted"
        );
        Ok(outcome)
    }

    async fn compact_locked(&self, kind: RecordKind) -> Result<CompactionReport, StoreError> {
        let _guard = self.locks.lock(kind).await;

        let report = compact(self.store.as_ref(), kind)
            .await
            .inspect_err(|e| self.metrics.record_store_error(e))?;
        self.metrics.record_compaction(kind, report.rows, report.moved);
        Ok(report)
    }
}

/// Run a locked write on its own task so a dropped request cannot stop it
/// between statements.
async fn run_to_completion<T, F>(task: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(task.in_current_span()).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => Err(StoreError::Query(format!("write task cancelled: {e}"))),
    }
}
