//! Route handlers organized by resource

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::Json;
use serde::Serialize;

use crate::http::error::ApiError;
use crate::models::RecordId;

pub mod health;
pub mod metrics;
pub mod students;
pub mod teachers;

/// `{"message": ...}` confirmation body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Read the `{id}` segment; any integer is accepted.
pub(crate) fn record_id(
    path: Result<Path<String>, PathRejection>,
    message: &'static str,
) -> Result<RecordId, ApiError> {
    let Path(raw) = path.map_err(ApiError::bad_request(message))?;
    RecordId::parse(&raw).map_err(ApiError::bad_request(message))
}

/// Unwrap a JSON body, answering a rejection with the operation's message.
pub(crate) fn json_body<T>(
    body: Result<Json<T>, JsonRejection>,
    message: &'static str,
) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(ApiError::bad_request(message))
}
