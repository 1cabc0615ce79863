//! Record kinds - one per table

use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// The two record tables served by schoolctl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Student,
    Teacher,
}

impl RecordKind {
    /// All kinds, in a stable order.
    pub const ALL: [RecordKind; 2] = [RecordKind::Student, RecordKind::Teacher];

    /// Table name in the relational store.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
        }
    }

    /// Lowercase label used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        self.table()
    }

    /// Index into per-kind arrays.
    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Student => 0,
            Self::Teacher => 1,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" | "students" => Ok(Self::Student),
            "teacher" | "teachers" => Ok(Self::Teacher),
            other => Err(ValidationError::InvalidVariant {
                field: "record kind",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names() {
        assert_eq!(RecordKind::Student.table(), "student");
        assert_eq!(RecordKind::Teacher.table(), "teacher");
    }

    #[test]
    fn parse_accepts_plural_and_case() {
        assert_eq!("Students".parse::<RecordKind>().unwrap(), RecordKind::Student);
        assert_eq!("teacher".parse::<RecordKind>().unwrap(), RecordKind::Teacher);
        assert!("parent".parse::<RecordKind>().is_err());
    }

    #[test]
    fn indexes_are_distinct() {
        assert_ne!(RecordKind::Student.index(), RecordKind::Teacher.index());
    }
}
