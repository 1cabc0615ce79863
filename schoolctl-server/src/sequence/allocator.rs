//! Next-id allocation for dense id sequences

use crate::db::{RecordStore, StoreError};
use crate::models::RecordKind;

/// Next id for `kind`: one past the current maximum, or 1 for an empty table.
///
/// This is a plain read. Nothing stops another writer from claiming the same
/// id before the caller inserts; `RecordService` serializes the pair.
pub async fn next_id(store: &dyn RecordStore, kind: RecordKind) -> Result<i64, StoreError> {
    let max = store.max_id(kind).await?.unwrap_or(0);
    Ok(max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{NewRecord, NewStudent, NewTeacher};

    #[tokio::test]
    async fn empty_table_starts_at_one() {
        let store = MemoryStore::new();
        assert_eq!(next_id(&store, RecordKind::Student).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn follows_the_maximum() {
        let store = MemoryStore::new();
        for id in 1..=3 {
            let record: NewRecord = NewStudent::new("s", "r", "c").into();
            store.insert(id, &record).await.unwrap();
        }

        assert_eq!(next_id(&store, RecordKind::Student).await.unwrap(), 4);
        assert_eq!(next_id(&store, RecordKind::Teacher).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn gaps_are_not_filled() {
        let store = MemoryStore::new();
        let record: NewRecord = NewTeacher::new("t", "s", "c").into();
        store.insert(7, &record).await.unwrap();

        assert_eq!(next_id(&store, RecordKind::Teacher).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn unserialized_creates_collide() {
        let store = MemoryStore::new();
        let alice: NewRecord = NewStudent::new("Alice", "R1", "5A").into();
        let bob: NewRecord = NewStudent::new("Bob", "R2", "5B").into();

        // Both readers see an empty table before either writes.
        let first = next_id(&store, RecordKind::Student).await.unwrap();
        let second = next_id(&store, RecordKind::Student).await.unwrap();
        assert_eq!((first, second), (1, 1));

        assert!(store.insert(first, &alice).await.is_ok());
        let err = store.insert(second, &bob).await.unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
        assert_eq!(store.ids(RecordKind::Student).await, vec![1]);
    }
}
