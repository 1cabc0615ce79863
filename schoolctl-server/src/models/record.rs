//! Kind-agnostic record wrappers used at the store boundary

use serde::Serialize;

use super::{NewStudent, NewTeacher, RecordKind, Student, Teacher};

/// A stored row of either kind.
///
/// Serializes as the bare row, so a list of records renders the same JSON
/// as a list of the concrete type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Student(Student),
    Teacher(Teacher),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Student(_) => RecordKind::Student,
            Self::Teacher(_) => RecordKind::Teacher,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Student(s) => s.id,
            Self::Teacher(t) => t.id,
        }
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        match self {
            Self::Student(s) => s.id = id,
            Self::Teacher(t) => t.id = id,
        }
    }
}

/// Insert payload of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewRecord {
    Student(NewStudent),
    Teacher(NewTeacher),
}

impl NewRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Student(_) => RecordKind::Student,
            Self::Teacher(_) => RecordKind::Teacher,
        }
    }

    pub fn with_id(&self, id: i64) -> Record {
        match self {
            Self::Student(s) => Record::Student(s.with_id(id)),
            Self::Teacher(t) => Record::Teacher(t.with_id(id)),
        }
    }
}

impl From<NewStudent> for NewRecord {
    fn from(s: NewStudent) -> Self {
        Self::Student(s)
    }
}

impl From<NewTeacher> for NewRecord {
    fn from(t: NewTeacher) -> Self {
        Self::Teacher(t)
    }
}
