//! API configuration.

use hushcut_models::{ExportPolicy, SilencePolicy};

/// Default per-request upload ceiling (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Per-request upload ceiling in bytes
    pub max_upload_bytes: usize,
    /// Default silence detection policy
    pub silence_policy: SilencePolicy,
    /// Export byte budget and bitrate ladder
    pub export_policy: ExportPolicy,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10_000,
            cors_origins: vec!["*".to_string()],
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            silence_policy: SilencePolicy::default(),
            export_policy: ExportPolicy::default(),
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let silence_policy = SilencePolicy::default()
            .with_min_silence_ms(env_parse("MIN_SILENCE_LEN_MS", defaults.silence_policy.min_silence_ms))
            .with_silence_thresh(env_parse(
                "SILENCE_THRESH_DBFS",
                defaults.silence_policy.silence_thresh_dbfs,
            ))
            .with_keep_silence_ms(env_parse("KEEP_SILENCE_MS", defaults.silence_policy.keep_silence_ms));

        let mut export_policy = ExportPolicy::default();
        export_policy.max_output_bytes =
            env_parse("MAX_OUTPUT_BYTES", export_policy.max_output_bytes);

        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: env_parse("PORT", defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            silence_policy,
            export_policy,
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
