//! API error types with IntoResponse
//!
//! Clients always get `{"error": "<fixed message>"}`; the status code tells
//! the failure kinds apart and the underlying cause is only logged.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::StoreError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Path or body could not be read (400)
    BadRequest {
        reason: String,
        message: &'static str,
    },

    /// Store failure, reported with a fixed per-operation message
    Store {
        source: StoreError,
        message: &'static str,
    },
}

impl ApiError {
    /// Map a store error to the fixed `message` of the failing operation.
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Store { source, message }
    }

    /// Map an unreadable path or body to the fixed `message` of the operation.
    pub fn bad_request<E: fmt::Display>(message: &'static str) -> impl FnOnce(E) -> ApiError {
        move |reason| ApiError::BadRequest {
            reason: reason.to_string(),
            message,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Store { source, .. } => match source {
                StoreError::ConstraintViolation(_) => StatusCode::CONFLICT,
                StoreError::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
                StoreError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::BadRequest { reason, message } => {
                tracing::warn!(reason = %reason, "{}", message);
                json!({ "error": message })
            }
            Self::Store { source, message } => {
                tracing::error!(kind = source.kind_label(), error = %source, "{}", message);
                json!({ "error": message })
            }
        };

        (status, Json(body)).into_response()
    }
}
