//! Domain models with validation at construction
//!
//! Rows mirror the `student` and `teacher` tables. Create payloads carry
//! every column except `id`, which the allocator assigns.

pub mod validation;
pub mod kind;
pub mod student;
pub mod teacher;
pub mod record;

pub use validation::{RecordId, ValidationError};
pub use kind::RecordKind;
pub use student::{NewStudent, Student};
pub use teacher::{NewTeacher, Teacher};
pub use record::{NewRecord, Record};
