//! Axum server setup
//!
//! Server skeleton with:
//! - CORS (permissive by default, localhost only on request)
//! - Tracing middleware and per-route request counters
//! - Panics in handlers turned into 500s
//! - Graceful shutdown on SIGTERM/Ctrl+C, then the pool is closed

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{MatchedPath, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::{PgRecordStore, RecordStore};
use crate::metrics::{MetricsRegistry, ProcessSampler};
use crate::sequence::RecordService;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3500;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:3500)
    pub bind_addr: SocketAddr,

    /// Allow any origin (default: true)
    ///
    /// When false only localhost origins are allowed.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            cors_permissive: true,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub service: RecordService,
    pub metrics: Arc<MetricsRegistry>,
    pub process: Arc<ProcessSampler>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let metrics = Arc::new(MetricsRegistry::new());
        Self {
            service: RecordService::new(store, metrics.clone()),
            metrics,
            process: Arc::new(ProcessSampler::new()),
        }
    }
}

/// Build the router with every route and middleware layer.
pub fn build_router(state: Arc<AppState>, cors_permissive: bool) -> Router {
    let cors = if cors_permissive {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin([
                axum::http::HeaderValue::from_static("http://localhost:3000"),
                axum::http::HeaderValue::from_static("http://localhost:3500"),
                axum::http::HeaderValue::from_static("http://127.0.0.1:3000"),
                axum::http::HeaderValue::from_static("http://127.0.0.1:3500"),
            ])
            .allow_methods(AnyOrigin)
            .allow_headers(AnyOrigin)
    };

    Router::new()
        .merge(routes::health::router())
        .merge(routes::students::router())
        .merge(routes::teachers::router())
        .merge(routes::metrics::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until a shutdown signal, then close the pool.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DatabaseConfig::default()).await?;
/// run_server(pool, ServerConfig::default()).await?;
/// ```
pub async fn run_server(pool: PgPool, config: ServerConfig) -> Result<(), ServerError> {
    if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
    }

    let state = Arc::new(AppState::new(Arc::new(PgRecordStore::new(pool.clone()))));
    let app = build_router(state, config.cors_permissive);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Backend running on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Closing database pool");
    pool.close().await;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Count every request against its matched route.
async fn track_requests(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(req).await;
    state
        .metrics
        .record_request(method.as_str(), &route, response.status().as_u16());
    response
}

/// Log a handler panic and answer 500 instead of dropping the connection.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "unknown panic payload".to_owned()
    };
    tracing::error!(panic = %detail, "Unhandled failure in request handler");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::db::{MemoryStore, RecordStore, StoreError, StoreOp};

    fn app() -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let state = Arc::new(AppState::new(store.clone()));
        (build_router(state, true), store)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3500);
        assert!(config.bind_addr.ip().is_unspecified());
        assert!(config.cors_permissive);
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (app, _) = app();
        let (status, body) = send(&app, get("/api/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "Backend is running" }));
    }

    #[tokio::test]
    async fn add_add_delete_renumbers_students() {
        let (app, _) = app();

        let (status, body) = send(
            &app,
            post("/api/addstudent", json!({"name": "Alice", "rollNo": "R1", "class": "5A"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Student added successfully" }));

        send(
            &app,
            post("/api/addstudent", json!({"name": "Bob", "rollNo": "R2", "class": "5B"})),
        )
        .await;

        let (_, body) = send(&app, get("/api/student")).await;
        assert_eq!(
            body,
            json!([
                {"id": 1, "name": "Alice", "roll_number": "R1", "class": "5A"},
                {"id": 2, "name": "Bob", "roll_number": "R2", "class": "5B"}
            ])
        );

        let (status, body) = send(&app, delete("/api/student/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Student deleted successfully" }));

        let (_, body) = send(&app, get("/api/student")).await;
        assert_eq!(
            body,
            json!([{"id": 1, "name": "Bob", "roll_number": "R2", "class": "5B"}])
        );
    }

    #[tokio::test]
    async fn teachers_have_their_own_sequence() {
        let (app, _) = app();
        send(
            &app,
            post("/api/addstudent", json!({"name": "Alice", "rollNo": "R1", "class": "5A"})),
        )
        .await;

        let (status, body) = send(
            &app,
            post("/api/addteacher", json!({"name": "Ada", "subject": "Math", "class": "9C"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Teacher added successfully" }));

        let (_, body) = send(&app, get("/api/teacher")).await;
        assert_eq!(
            body,
            json!([{"id": 1, "name": "Ada", "subject": "Math", "class": "9C"}])
        );
    }

    #[tokio::test]
    async fn deleting_unknown_id_still_succeeds() {
        let (app, store) = app();
        send(
            &app,
            post("/api/addteacher", json!({"name": "Ada", "subject": "Math", "class": "9C"})),
        )
        .await;

        let (status, body) = send(&app, delete("/api/teacher/99")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Teacher deleted successfully" }));
        assert_eq!(store.ids(crate::models::RecordKind::Teacher).await, vec![1]);
        assert_eq!(store.update_calls(), 1);
    }

    #[tokio::test]
    async fn non_numeric_id_is_400_with_fixed_message() {
        let (app, store) = app();
        let (status, body) = send(&app, delete("/api/student/abc")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Failed to delete student" }));
        assert_eq!(store.update_calls(), 0);
    }

    #[tokio::test]
    async fn zero_and_negative_ids_delete_nothing_but_still_compact() {
        let (app, store) = app();
        for name in ["Alice", "Bob"] {
            send(
                &app,
                post("/api/addstudent", json!({"name": name, "rollNo": "R", "class": "5A"})),
            )
            .await;
        }
        // leave a gap at id 1 without going through the delete path
        store
            .delete_by_id(crate::models::RecordKind::Student, 1)
            .await
            .unwrap();

        let (status, body) = send(&app, delete("/api/student/0")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Student deleted successfully" }));
        assert_eq!(store.ids(crate::models::RecordKind::Student).await, vec![1]);
        assert_eq!(store.update_calls(), 1);

        let (status, body) = send(&app, delete("/api/student/-1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Student deleted successfully" }));
        assert_eq!(store.ids(crate::models::RecordKind::Student).await, vec![1]);
        assert_eq!(store.update_calls(), 2);
    }

    #[tokio::test]
    async fn create_with_missing_field_is_rejected_as_json() {
        let (app, store) = app();
        let (status, body) = send(
            &app,
            post("/api/addstudent", json!({"name": "Alice", "class": "5A"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Failed to add student" }));
        assert!(store.ids(crate::models::RecordKind::Student).await.is_empty());
    }

    #[tokio::test]
    async fn create_without_content_type_is_rejected_as_json() {
        let (app, _) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/addteacher")
            .body(Body::from(
                json!({"name": "Ada", "subject": "Math", "class": "9C"}).to_string(),
            ))
            .unwrap();

        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Failed to add teacher" }));
    }

    #[tokio::test]
    async fn duplicate_id_is_409() {
        let (app, store) = app();
        store
            .fail_next(StoreOp::Insert, StoreError::ConstraintViolation("dup".into()))
            .await;

        let (status, body) = send(
            &app,
            post("/api/addstudent", json!({"name": "Alice", "rollNo": "R1", "class": "5A"})),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "error": "Failed to add student" }));
    }

    #[tokio::test]
    async fn lost_connection_during_compaction_is_503() {
        let (app, store) = app();
        send(
            &app,
            post("/api/addstudent", json!({"name": "Alice", "rollNo": "R1", "class": "5A"})),
        )
        .await;
        store
            .fail_next(StoreOp::Ids, StoreError::Connectivity("reset".into()))
            .await;

        let (status, body) = send(&app, delete("/api/student/1")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({ "error": "Failed to delete student" }));
    }

    #[tokio::test]
    async fn list_failure_is_reported() {
        let (app, store) = app();
        store
            .fail_next(StoreOp::List, StoreError::Query("bad".into()))
            .await;

        let (status, body) = send(&app, get("/api/teacher")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch teachers" }));
    }

    #[tokio::test]
    async fn metrics_endpoint_exposes_counters() {
        let (app, _) = app();
        send(
            &app,
            post("/api/addstudent", json!({"name": "Alice", "rollNo": "R1", "class": "5A"})),
        )
        .await;

        let response = app.clone().oneshot(get("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            crate::metrics::CONTENT_TYPE
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("schoolctl_records_created_total{kind=\"student\"} 1"));
        assert!(text.contains(
            "schoolctl_http_requests_total{method=\"POST\",route=\"/api/addstudent\",status=\"200\"} 1"
        ));
    }

    #[test]
    fn panic_handler_answers_500() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
