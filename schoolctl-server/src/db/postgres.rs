//! Postgres-backed record store
//!
//! Every statement is a single parameterized query against the pool. Ids are
//! cast to BIGINT on the way out so pre-existing INTEGER columns decode.

use async_trait::async_trait;
use sqlx::PgPool;

use super::store::{RecordStore, StoreError};
use crate::models::{NewRecord, Record, RecordKind, Student, Teacher};

/// Per-table SQL.
struct Statements {
    list: &'static str,
    max_id: &'static str,
    delete: &'static str,
    ids: &'static str,
    update_id: &'static str,
}

const STUDENT_SQL: Statements = Statements {
    list: r#"SELECT id::BIGINT AS id, name, roll_number, "class" FROM student ORDER BY id"#,
    max_id: "SELECT MAX(id)::BIGINT FROM student",
    delete: "DELETE FROM student WHERE id = $1",
    ids: "SELECT id::BIGINT FROM student ORDER BY id",
    update_id: "UPDATE student SET id = $1 WHERE id = $2",
};

const TEACHER_SQL: Statements = Statements {
    list: r#"SELECT id::BIGINT AS id, name, subject, "class" FROM teacher ORDER BY id"#,
    max_id: "SELECT MAX(id)::BIGINT FROM teacher",
    delete: "DELETE FROM teacher WHERE id = $1",
    ids: "SELECT id::BIGINT FROM teacher ORDER BY id",
    update_id: "UPDATE teacher SET id = $1 WHERE id = $2",
};

fn statements(kind: RecordKind) -> &'static Statements {
    match kind {
        RecordKind::Student => &STUDENT_SQL,
        RecordKind::Teacher => &TEACHER_SQL,
    }
}

/// Record store over a shared connection pool.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list_all(&self, kind: RecordKind) -> Result<Vec<Record>, StoreError> {
        let sql = statements(kind).list;
        let records = match kind {
            RecordKind::Student => sqlx::query_as::<_, Student>(sql)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(Record::Student)
                .collect(),
            RecordKind::Teacher => sqlx::query_as::<_, Teacher>(sql)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(Record::Teacher)
                .collect(),
        };
        Ok(records)
    }

    async fn max_id(&self, kind: RecordKind) -> Result<Option<i64>, StoreError> {
        let (max,): (Option<i64>,) = sqlx::query_as(statements(kind).max_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(max)
    }

    async fn insert(&self, id: i64, record: &NewRecord) -> Result<(), StoreError> {
        match record {
            NewRecord::Student(s) => {
                sqlx::query(
                    r#"INSERT INTO student (id, name, roll_number, "class") VALUES ($1, $2, $3, $4)"#,
                )
                .bind(id)
                .bind(&s.name)
                .bind(&s.roll_number)
                .bind(&s.class_name)
                .execute(&self.pool)
                .await?;
            }
            NewRecord::Teacher(t) => {
                sqlx::query(
                    r#"INSERT INTO teacher (id, name, subject, "class") VALUES ($1, $2, $3, $4)"#,
                )
                .bind(id)
                .bind(&t.name)
                .bind(&t.subject)
                .bind(&t.class_name)
                .execute(&self.pool)
                .await?;
            }
        }
        Ok(())
    }

    async fn delete_by_id(&self, kind: RecordKind, id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query(statements(kind).delete)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ids_ascending(&self, kind: RecordKind) -> Result<Vec<i64>, StoreError> {
        let ids: Vec<(i64,)> = sqlx::query_as(statements(kind).ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    async fn update_id(
        &self,
        kind: RecordKind,
        old_id: i64,
        new_id: i64,
    ) -> Result<(), StoreError> {
        sqlx::query(statements(kind).update_id)
            .bind(new_id)
            .bind(old_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
