//! Teacher endpoints

use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};

use super::{json_body, record_id, MessageResponse};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{NewTeacher, Record, RecordKind};

const ADD_FAILED: &str = "Failed to add teacher";
const DELETE_FAILED: &str = "Failed to delete teacher";

/// GET /api/teacher
async fn list_teachers(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state
        .service
        .list(RecordKind::Teacher)
        .await
        .map_err(ApiError::store("Failed to fetch teachers"))?;

    Ok(Json(records))
}

/// POST /api/addteacher
async fn add_teacher(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewTeacher>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = json_body(body, ADD_FAILED)?;
    state
        .service
        .create(req.into())
        .await
        .map_err(ApiError::store(ADD_FAILED))?;

    Ok(Json(MessageResponse::new("Teacher added successfully")))
}

/// DELETE /api/teacher/{id}
async fn delete_teacher(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = record_id(path, DELETE_FAILED)?;
    state
        .service
        .delete(RecordKind::Teacher, id)
        .await
        .map_err(ApiError::store(DELETE_FAILED))?;

    Ok(Json(MessageResponse::new("Teacher deleted successfully")))
}

/// Teacher routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/teacher", get(list_teachers))
        .route("/api/addteacher", post(add_teacher))
        .route("/api/teacher/{id}", delete(delete_teacher))
}
