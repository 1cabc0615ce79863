//! In-memory record store for testing
//!
//! Enforces the same unique-id constraint as the real tables and can be told
//! to fail specific operations. Every call yields to the scheduler first, so
//! concurrent callers interleave the way they would against a real pool.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::store::{RecordStore, StoreError};
use crate::models::{NewRecord, Record, RecordKind};

/// Store operations that can be targeted by injected faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    List,
    MaxId,
    Insert,
    Delete,
    Ids,
    UpdateId,
}

struct Fault {
    op: StoreOp,
    skip: usize,
    error: StoreError,
}

#[derive(Default)]
struct Tables {
    rows: [Vec<Record>; 2],
}

impl Tables {
    fn table(&self, kind: RecordKind) -> &Vec<Record> {
        &self.rows[kind.index()]
    }

    fn table_mut(&mut self, kind: RecordKind) -> &mut Vec<Record> {
        &mut self.rows[kind.index()]
    }
}

/// Record store held entirely in process memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    faults: Mutex<Vec<Fault>>,
    update_calls: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next call to `op` with `error`.
    pub async fn fail_next(&self, op: StoreOp, error: StoreError) {
        self.fail_nth(op, 0, error).await;
    }

    /// Let `skip` calls to `op` succeed, then fail the one after with `error`.
    pub async fn fail_nth(&self, op: StoreOp, skip: usize, error: StoreError) {
        self.faults.lock().await.push(Fault { op, skip, error });
    }

    /// Number of `update_id` calls issued so far, including no-op moves.
    pub fn update_calls(&self) -> u64 {
        self.update_calls.load(Ordering::Relaxed)
    }

    /// Ids of `kind` in storage order.
    pub async fn ids(&self, kind: RecordKind) -> Vec<i64> {
        self.tables
            .lock()
            .await
            .table(kind)
            .iter()
            .map(Record::id)
            .collect()
    }

    async fn check(&self, op: StoreOp) -> Result<(), StoreError> {
        tokio::task::yield_now().await;

        let mut faults = self.faults.lock().await;
        let Some(pos) = faults.iter().position(|f| f.op == op) else {
            return Ok(());
        };
        if faults[pos].skip > 0 {
            faults[pos].skip -= 1;
            return Ok(());
        }
        Err(faults.remove(pos).error)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_all(&self, kind: RecordKind) -> Result<Vec<Record>, StoreError> {
        self.check(StoreOp::List).await?;
        let mut rows = self.tables.lock().await.table(kind).clone();
        rows.sort_by_key(Record::id);
        Ok(rows)
    }

    async fn max_id(&self, kind: RecordKind) -> Result<Option<i64>, StoreError> {
        self.check(StoreOp::MaxId).await?;
        Ok(self.tables.lock().await.table(kind).iter().map(Record::id).max())
    }

    async fn insert(&self, id: i64, record: &NewRecord) -> Result<(), StoreError> {
        self.check(StoreOp::Insert).await?;
        let mut tables = self.tables.lock().await;
        let table = tables.table_mut(record.kind());
        if table.iter().any(|r| r.id() == id) {
            return Err(StoreError::ConstraintViolation(format!(
                "duplicate key value violates unique constraint \"{}_pkey\": id={}",
                record.kind().table(),
                id
            )));
        }
        table.push(record.with_id(id));
        Ok(())
    }

    async fn delete_by_id(&self, kind: RecordKind, id: i64) -> Result<u64, StoreError> {
        self.check(StoreOp::Delete).await?;
        let mut tables = self.tables.lock().await;
        let table = tables.table_mut(kind);
        let before = table.len();
        table.retain(|r| r.id() != id);
        Ok((before - table.len()) as u64)
    }

    async fn ids_ascending(&self, kind: RecordKind) -> Result<Vec<i64>, StoreError> {
        self.check(StoreOp::Ids).await?;
        let mut ids: Vec<i64> = self
            .tables
            .lock()
            .await
            .table(kind)
            .iter()
            .map(Record::id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn update_id(
        &self,
        kind: RecordKind,
        old_id: i64,
        new_id: i64,
    ) -> Result<(), StoreError> {
        self.check(StoreOp::UpdateId).await?;
        self.update_calls.fetch_add(1, Ordering::Relaxed);

        let mut tables = self.tables.lock().await;
        let table = tables.table_mut(kind);
        if old_id != new_id && table.iter().any(|r| r.id() == new_id) {
            return Err(StoreError::ConstraintViolation(format!(
                "duplicate key value violates unique constraint \"{}_pkey\": id={}",
                kind.table(),
                new_id
            )));
        }
        if let Some(row) = table.iter_mut().find(|r| r.id() == old_id) {
            row.set_id(new_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewStudent, NewTeacher};

    fn student(name: &str) -> NewRecord {
        NewStudent::new(name, "R", "1A").into()
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = MemoryStore::new();
        store.insert(1, &student("Alice")).await.unwrap();

        let err = store.insert(1, &student("Bob")).await.unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
        assert_eq!(store.ids(RecordKind::Student).await, vec![1]);
    }

    #[tokio::test]
    async fn tables_are_independent() {
        let store = MemoryStore::new();
        store.insert(1, &student("Alice")).await.unwrap();
        store
            .insert(1, &NewTeacher::new("Ada", "Math", "9C").into())
            .await
            .unwrap();

        assert_eq!(store.max_id(RecordKind::Student).await.unwrap(), Some(1));
        assert_eq!(store.max_id(RecordKind::Teacher).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn delete_missing_row_matches_zero() {
        let store = MemoryStore::new();
        store.insert(1, &student("Alice")).await.unwrap();

        assert_eq!(store.delete_by_id(RecordKind::Student, 9).await.unwrap(), 0);
        assert_eq!(store.delete_by_id(RecordKind::Student, 1).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_onto_taken_id_is_rejected() {
        let store = MemoryStore::new();
        store.insert(1, &student("Alice")).await.unwrap();
        store.insert(2, &student("Bob")).await.unwrap();

        let err = store
            .update_id(RecordKind::Student, 2, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn injected_fault_fires_once() {
        let store = MemoryStore::new();
        store
            .fail_nth(StoreOp::List, 1, StoreError::Connectivity("gone".into()))
            .await;

        assert!(store.list_all(RecordKind::Student).await.is_ok());
        assert!(store.list_all(RecordKind::Student).await.is_err());
        assert!(store.list_all(RecordKind::Student).await.is_ok());
    }
}
