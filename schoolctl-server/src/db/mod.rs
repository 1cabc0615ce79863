//! Database layer - connection pool and record stores
//!
//! - Connection pool with a bounded number of connections
//! - `RecordStore` trait with Postgres and in-memory implementations
//! - Opt-in table bootstrap for empty databases

pub mod pool;
pub mod store;
pub mod postgres;
pub mod memory;
pub mod bootstrap;

pub use pool::{create_pool, DatabaseConfig};
pub use store::{RecordStore, StoreError};
pub use postgres::PgRecordStore;
pub use memory::{MemoryStore, StoreOp};
