//! Student rows and create payloads

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Student row as stored in the `student` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub roll_number: String,
    #[serde(rename = "class")]
    #[sqlx(rename = "class")]
    pub class_name: String,
}

/// Fields for a new student; the id is assigned by the allocator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewStudent {
    pub name: String,
    #[serde(rename = "rollNo")]
    pub roll_number: String,
    #[serde(rename = "class")]
    pub class_name: String,
}

impl NewStudent {
    pub fn new(
        name: impl Into<String>,
        roll_number: impl Into<String>,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            roll_number: roll_number.into(),
            class_name: class_name.into(),
        }
    }

    /// Materialize the row this payload becomes under `id`.
    pub fn with_id(&self, id: i64) -> Student {
        Student {
            id,
            name: self.name.clone(),
            roll_number: self.roll_number.clone(),
            class_name: self.class_name.clone(),
        }
    }
}
