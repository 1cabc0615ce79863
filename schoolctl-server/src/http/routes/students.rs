//! Student endpoints

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
use crate::models::{NewStudent, Record, RecordKind};

const ADD_FAILED: &str = "Failed to add student";
const DELETE_FAILED: &str = "Failed to delete student";

/// GET /api/student - list all students
async fn list_students(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state
        .service
        .list(RecordKind::Student)
        .await
        .map_err(ApiError::store("Failed to fetch students"))?;

    Ok(Json(records))
}

/// POST /api/addstudent - insert under the next dense id
async fn add_student(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewStudent>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = json_body(body, ADD_FAILED)?;
    state
        .service
        .create(req.into())
        .await
        .map_err(ApiError::store(ADD_FAILED))?;

    Ok(Json(MessageResponse::new("Student added successfully")))
}

/// DELETE /api/student/{id} - delete, then renumber the survivors
async fn delete_student(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = record_id(path, DELETE_FAILED)?;
    state
        .service
        .delete(RecordKind::Student, id)
        .await
        .map_err(ApiError::store(DELETE_FAILED))?;

    Ok(Json(MessageResponse::new("Student deleted successfully")))
}

/// Student routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/student", get(list_students))
        .route("/api/addstudent", post(add_student))
        .route("/api/student/{id}", delete(delete_student))
}
