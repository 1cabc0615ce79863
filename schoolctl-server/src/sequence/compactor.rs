//! Id compaction after deletes
//!
//! Surviving rows are renumbered `1..=N` in ascending id order, one UPDATE per
//! row, including rows whose id is already correct. A failure stops the pass
//! where it is; earlier updates are not rolled back.

use crate::db::{RecordStore, StoreError};
use crate::models::RecordKind;

/// Outcome of one compaction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompactionReport {
    /// Rows renumbered (one update issued per row)
    pub rows: u64,
    /// Rows whose id actually changed
    pub moved: u64,
}

/// Renumber every row of `kind` to a dense `1..=N` sequence.
pub async fn compact(
    store: &dyn RecordStore,
    kind: RecordKind,
) -> Result<CompactionReport, StoreError> {
    let ids = store.ids_ascending(kind).await?;
    let mut report = CompactionReport::default();

    // Ascending order means position i holds an id >= i + 1, and every
    // unprocessed row holds a larger one, so the target is always free.
    for (position, old_id) in ids.into_iter().enumerate() {
        let new_id = position as i64 + 1;
        store.update_id(kind, old_id, new_id).await?;

        report.rows += 1;
        if old_id != new_id {
            report.moved += 1;
        }
    }

    tracing::debug!(kind = %kind, rows = report.rows, moved = report.moved, "Compacted ids");
    Ok(report)
}
