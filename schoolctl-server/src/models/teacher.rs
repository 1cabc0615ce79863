//! Teacher rows and create payloads

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Teacher row as stored in the `teacher` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub subject: String,
    #[serde(rename = "class")]
    #[sqlx(rename = "class")]
    pub class_name: String,
}

/// Fields for a new teacher; the id is assigned by the allocator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTeacher {
    pub name: String,
    pub subject: String,
    #[serde(rename = "class")]
    pub class_name: String,
}

impl NewTeacher {
    pub fn new(
        name: impl Into<String>,
        subject: impl Into<String>,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            subject: subject.into(),
            class_name: class_name.into(),
        }
    }

    pub fn with_id(&self, id: i64) -> Teacher {
        Teacher {
            id,
            name: self.name.clone(),
            subject: self.subject.clone(),
            class_name: self.class_name.clone(),
        }
    }
}
