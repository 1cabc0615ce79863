//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// String doesn't match required format
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Invalid enum variant
    InvalidVariant { field: &'static str, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// A record id taken from user input.
///
/// Any integer is accepted. Zero, negative or unknown ids match no row, and
/// the delete still succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(i64);

impl RecordId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Parse a path segment such as `"12"` or `"-1"`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        raw.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "id",
                reason: "must be an integer",
            })
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}
