//! Size-bounded export with a descending bitrate search.
//!
//! The exporter encodes the assembled track at each candidate bitrate in
//! descending order and accepts the first artifact under the byte budget.
//! If no candidate fits, one extreme-compression encode is returned
//! unconditionally: the contract guarantees an attempt at compliance,
//! not compliance itself. The search is a bounded linear walk over a
//! fixed table, never open-ended recursion, so callers can assert at most
//! `ladder.len() + 1` encode invocations.

use std::path::Path;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use hushcut_models::{ExportPolicy, OutputFormat};

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};
use crate::track::{PcmSpec, Track};

/// Encoder quality scale used for ladder attempts (`-q:a`).
const LADDER_QUALITY: u8 = 2;
/// Worst-quality scale used for the extreme-compression fallback.
const FALLBACK_QUALITY: u8 = 9;

/// Settings for a single encode attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSettings {
    /// Target bitrate in kbps; `None` for lossless formats.
    pub bitrate_kbps: Option<u32>,
    /// Encoder quality scale (`-q:a`); `None` to use the codec default.
    pub quality: Option<u8>,
}

/// Seam between the export search and the actual codec.
///
/// The production implementation shells out to FFmpeg; tests substitute
/// a mock to drive the search without a codec on the machine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioEncoder: Send + Sync {
    /// Encode raw `f32le` PCM at `pcm_path` into `dest`, returning the
    /// encoded byte size.
    async fn encode(
        &self,
        pcm_path: &Path,
        spec: PcmSpec,
        dest: &Path,
        format: OutputFormat,
        settings: &EncodeSettings,
    ) -> MediaResult<u64>;
}

/// FFmpeg-backed encoder.
#[derive(Debug, Default)]
pub struct FfmpegEncoder;

#[async_trait]
impl AudioEncoder for FfmpegEncoder {
    async fn encode(
        &self,
        pcm_path: &Path,
        spec: PcmSpec,
        dest: &Path,
        format: OutputFormat,
        settings: &EncodeSettings,
    ) -> MediaResult<u64> {
        let mut cmd = FfmpegCommand::new(pcm_path, dest)
            .raw_pcm_input(spec.sample_rate, spec.channels)
            .audio_codec(format.ffmpeg_codec())
            .container(format.ffmpeg_container());

        if let Some(kbps) = settings.bitrate_kbps {
            cmd = cmd.audio_bitrate_kbps(kbps);
        }
        if let Some(quality) = settings.quality {
            cmd = cmd.audio_quality(quality);
        }

        cmd.run().await?;

        let metadata = tokio::fs::metadata(dest).await?;
        Ok(metadata.len())
    }
}

/// A successful export: the winning artifact and how it was produced.
///
/// The temporary file is deleted when this value is dropped, which keeps
/// the no-artifact-outlives-its-request invariant on every exit path.
pub struct ExportResult {
    /// The encoded artifact.
    pub file: NamedTempFile,
    /// Encoded size in bytes.
    pub bytes: u64,
    /// Bitrate that won the search; `None` for lossless formats.
    pub bitrate_kbps: Option<u32>,
    /// Whether the extreme-compression fallback produced this artifact.
    pub used_fallback: bool,
}

impl std::fmt::Debug for ExportResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportResult")
            .field("bytes", &self.bytes)
            .field("bitrate_kbps", &self.bitrate_kbps)
            .field("used_fallback", &self.used_fallback)
            .finish()
    }
}

/// Encode `track` as `format`, keeping the result under the byte budget
/// when the codec allows it.
///
/// Lossy formats walk the bitrate ladder; a failed or oversized candidate
/// is discarded immediately and the search moves to the next lower rate.
/// Lossless formats take a single encode, returned unconditionally, since
/// bitrate is meaningless for PCM-style codecs.
pub async fn export_with_budget(
    track: &Track,
    format: OutputFormat,
    policy: &ExportPolicy,
    encoder: &dyn AudioEncoder,
) -> MediaResult<ExportResult> {
    let spec = track.spec();

    // The PCM intermediate is written once and shared by every attempt.
    let pcm = NamedTempFile::new()?;
    tokio::fs::write(pcm.path(), track.to_f32le_bytes()).await?;

    if !format.is_lossy() {
        let dest = NamedTempFile::new()?;
        let settings = EncodeSettings {
            bitrate_kbps: None,
            quality: None,
        };
        let bytes = encoder
            .encode(pcm.path(), spec, dest.path(), format, &settings)
            .await?;

        if bytes > policy.max_output_bytes {
            warn!(
                bytes,
                budget = policy.max_output_bytes,
                format = %format,
                "Lossless export exceeds byte budget, returning it anyway"
            );
        }

        return Ok(ExportResult {
            file: dest,
            bytes,
            bitrate_kbps: None,
            used_fallback: false,
        });
    }

    let mut failures: Vec<String> = Vec::new();

    for &kbps in &policy.bitrate_ladder {
        let dest = NamedTempFile::new()?;
        let settings = EncodeSettings {
            bitrate_kbps: Some(kbps),
            quality: Some(LADDER_QUALITY),
        };

        match encoder
            .encode(pcm.path(), spec, dest.path(), format, &settings)
            .await
        {
            Ok(bytes) if bytes <= policy.max_output_bytes => {
                info!(bitrate_kbps = kbps, bytes, "Export candidate accepted");
                return Ok(ExportResult {
                    file: dest,
                    bytes,
                    bitrate_kbps: Some(kbps),
                    used_fallback: false,
                });
            }
            Ok(bytes) => {
                debug!(
                    bitrate_kbps = kbps,
                    bytes,
                    budget = policy.max_output_bytes,
                    "Candidate over budget, trying next bitrate"
                );
                // dest dropped here, artifact reclaimed immediately
            }
            Err(e) => {
                warn!(bitrate_kbps = kbps, error = %e, "Encode failed, trying next bitrate");
                failures.push(format!("{}kbps: {}", kbps, e));
            }
        }
    }

    // No ladder candidate fit; one extreme-compression attempt, returned
    // even if it still exceeds the budget.
    let dest = NamedTempFile::new()?;
    let settings = EncodeSettings {
        bitrate_kbps: Some(policy.fallback_kbps),
        quality: Some(FALLBACK_QUALITY),
    };

    match encoder
        .encode(pcm.path(), spec, dest.path(), format, &settings)
        .await
    {
        Ok(bytes) => {
            warn!(
                bitrate_kbps = policy.fallback_kbps,
                bytes,
                over_budget = bytes > policy.max_output_bytes,
                "Used extreme-compression fallback"
            );
            Ok(ExportResult {
                file: dest,
                bytes,
                bitrate_kbps: Some(policy.fallback_kbps),
                used_fallback: true,
            })
        }
        Err(e) => {
            failures.push(format!("{}kbps (fallback): {}", policy.fallback_kbps, e));
            Err(MediaError::ExportExhausted(failures.join("; ")))
        }
    }
}
