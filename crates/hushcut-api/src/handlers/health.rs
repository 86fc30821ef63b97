//! Health and service-info handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub active_jobs: usize,
}

/// Health check endpoint (liveness probe).
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        active_jobs: state.jobs.active_count(),
    })
}

/// Service description with the default policy parameters in effect.
#[derive(Serialize)]
pub struct ServiceInfo {
    pub status: String,
    pub service: String,
    pub version: String,
    pub parameters: PolicyParameters,
}

#[derive(Serialize)]
pub struct PolicyParameters {
    pub min_silence_len: u64,
    pub silence_thresh: f64,
    pub keep_silence: u64,
}

/// Root endpoint describing the service.
pub async fn home(State(state): State<AppState>) -> Json<ServiceInfo> {
    let policy = &state.config.silence_policy;
    Json(ServiceInfo {
        status: "running".to_string(),
        service: "HushCut Audio Silence Cutter".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        parameters: PolicyParameters {
            min_silence_len: policy.min_silence_ms,
            silence_thresh: policy.silence_thresh_dbfs,
            keep_silence: policy.keep_silence_ms,
        },
    })
}
