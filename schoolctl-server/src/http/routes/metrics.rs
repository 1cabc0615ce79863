//! Prometheus scrape endpoint

use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse, routing::get, Router};

use crate::http::server::AppState;
use crate::metrics::{self, ProcessMetrics};

/// GET /metrics
async fn scrape(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    // sysinfo reads /proc, keep it off the async workers
    let sampler = state.process.clone();
    let process = tokio::task::spawn_blocking(move || sampler.sample())
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Process metrics collection failed: {}", e);
            ProcessMetrics::default()
        });

    (
        [(header::CONTENT_TYPE, metrics::CONTENT_TYPE)],
        metrics::render(&state.metrics, &process),
    )
}

/// Metrics routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/metrics", get(scrape))
}
