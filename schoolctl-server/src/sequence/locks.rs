//! Per-table write locks

use tokio::sync::{Mutex, MutexGuard};

use crate::models::RecordKind;

/// One async mutex per record table.
///
/// Held across allocate+insert and delete+compact so those sequences never
/// interleave with another write to the same table in this process.
#[derive(Debug, Default)]
pub struct TableLocks {
    tables: [Mutex<()>; 2],
}

impl TableLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, kind: RecordKind) -> MutexGuard<'_, ()> {
        self.tables[kind.index()].lock().await
    }
}
