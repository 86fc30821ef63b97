//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{get_job, health, home, process_audio, submit_async};
use crate::middleware::{cors_layer, request_id, request_logging};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    // Multipart framing adds overhead on top of the per-file ceiling
    let body_limit = state.config.max_upload_bytes * 2;

    Router::new()
        .route("/process-audio", post(process_audio))
        .route("/process-audio-async", post(submit_async))
        .route("/job/:job_id", get(get_job))
        .route("/health", get(health))
        .route("/", get(home))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
