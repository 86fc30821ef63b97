//! Silence detection and export policy.
//!
//! These parameters control how aggressively silence is detected and cut,
//! and how the trimmed track is re-encoded under a byte budget.

use serde::{Deserialize, Serialize};

/// Default minimum silence duration before a gap splits the audio (ms).
pub const DEFAULT_MIN_SILENCE_MS: u64 = 45;
/// Default silence threshold in dBFS.
pub const DEFAULT_SILENCE_THRESH_DBFS: f64 = -45.0;
/// Default padding kept on each side of a non-silent range (ms).
pub const DEFAULT_KEEP_SILENCE_MS: u64 = 30;

/// Default byte budget for encoded output (50 MiB).
pub const DEFAULT_MAX_OUTPUT_BYTES: u64 = 50 * 1024 * 1024;
/// Descending candidate bitrates tried during export (kbps).
pub const DEFAULT_BITRATE_LADDER: [u32; 7] = [256, 192, 160, 128, 96, 64, 32];
/// Last-resort bitrate when no ladder candidate fits (kbps).
pub const EXTREME_FALLBACK_KBPS: u32 = 24;

/// Configuration for amplitude-threshold silence detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SilencePolicy {
    /// Minimum silence duration before a gap counts as a split (milliseconds).
    ///
    /// Shorter dips in loudness are absorbed into the surrounding speech,
    /// which is what lets brief pauses inside words survive.
    pub min_silence_ms: u64,

    /// Loudness threshold in dBFS; windows below this are silent.
    pub silence_thresh_dbfs: f64,

    /// Padding kept on each side of every non-silent range (milliseconds).
    pub keep_silence_ms: u64,
}

impl Default for SilencePolicy {
    fn default() -> Self {
        Self {
            min_silence_ms: DEFAULT_MIN_SILENCE_MS,
            silence_thresh_dbfs: DEFAULT_SILENCE_THRESH_DBFS,
            keep_silence_ms: DEFAULT_KEEP_SILENCE_MS,
        }
    }
}

impl SilencePolicy {
    /// Builder-style setter for the minimum silence duration.
    pub fn with_min_silence_ms(mut self, ms: u64) -> Self {
        self.min_silence_ms = ms.max(1);
        self
    }

    /// Builder-style setter for the silence threshold.
    pub fn with_silence_thresh(mut self, dbfs: f64) -> Self {
        self.silence_thresh_dbfs = dbfs;
        self
    }

    /// Builder-style setter for the keep-silence padding.
    pub fn with_keep_silence_ms(mut self, ms: u64) -> Self {
        self.keep_silence_ms = ms;
        self
    }
}

/// Configuration for the size-bounded export search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportPolicy {
    /// Hard byte budget for the encoded artifact.
    pub max_output_bytes: u64,

    /// Candidate bitrates in kbps, tried in descending order.
    pub bitrate_ladder: Vec<u32>,

    /// Bitrate for the unconditional extreme-compression fallback (kbps).
    pub fallback_kbps: u32,
}

impl Default for ExportPolicy {
    fn default() -> Self {
        Self {
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            bitrate_ladder: DEFAULT_BITRATE_LADDER.to_vec(),
            fallback_kbps: EXTREME_FALLBACK_KBPS,
        }
    }
}

impl ExportPolicy {
    /// Maximum number of encode attempts the search can make.
    pub fn max_attempts(&self) -> usize {
        self.bitrate_ladder.len() + 1
    }
}
