//! Application state.

use std::sync::Arc;

use hushcut_media::{AudioEncoder, FfmpegEncoder};

use crate::config::ApiConfig;
use crate::jobs::JobStore;

/// Shared application state.
///
/// Every pipeline invocation operates on its own decoded track and temp
/// artifacts; the only cross-request mutable state is the job store.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub jobs: JobStore,
    pub encoder: Arc<dyn AudioEncoder>,
}

impl AppState {
    /// Create state with the FFmpeg-backed encoder.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            jobs: JobStore::new(),
            encoder: Arc::new(FfmpegEncoder),
        }
    }
}
