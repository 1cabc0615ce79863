//! HTTP server layer
//!
//! Axum server with:
//! - CORS
//! - Request tracing and counters
//! - Graceful shutdown
//! - JSON error responses

pub mod server;
pub mod error;
pub mod routes;

pub use server::{build_router, run_server, AppState, ServerConfig, ServerError, DEFAULT_PORT};
pub use error::ApiError;
