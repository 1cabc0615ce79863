//! schoolctl-server: student and teacher records over HTTP
//!
//! Records of each kind carry dense ids `1..=N`. Creating a record takes the
//! next id after the current maximum; deleting one renumbers every surviving
//! row so the sequence stays gap-free.

pub mod db;
pub mod http;
pub mod metrics;
pub mod models;
pub mod sequence;

pub use db::{create_pool, DatabaseConfig, PgRecordStore, RecordStore, StoreError};
pub use http::{build_router, run_server, AppState, ServerConfig};
pub use models::{RecordKind, RecordId};
pub use sequence::{CompactionReport, RecordService};
