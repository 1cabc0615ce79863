//! Dense sequential id management
//!
//! - `allocator`: next id = max + 1
//! - `compactor`: renumber survivors to 1..=N after a delete
//! - `locks`: per-table mutex
//! - `service`: the locked create / delete sequences used by handlers

pub mod allocator;
pub mod compactor;
pub mod locks;
pub mod service;

pub use allocator::next_id;
pub use compactor::{compact, CompactionReport};
pub use locks::TableLocks;
pub use service::{DeleteOutcome, RecordService};
