//! Axum HTTP API server for the HushCut silence-trimming service.
//!
//! This crate provides:
//! - Multipart upload handling for one or many audio files
//! - The batch orchestrator wiring uploads through the trim pipeline
//! - Zip bundling with a machine-readable processing summary
//! - An optional async job facade with single-delivery polling

pub mod archive;
pub mod batch;
pub mod config;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use jobs::JobStore;
pub use routes::create_router;
pub use state::AppState;
