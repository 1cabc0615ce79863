//! Command implementations for schoolctl CLI

pub mod compact;
pub mod serve;

pub use compact::run_compact;
pub use serve::run_serve;
