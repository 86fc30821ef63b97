//! Decoding uploads into raw PCM tracks.
//!
//! FFmpeg is treated as a black box that converts any supported container
//! into raw `f32le` samples at the file's native rate and channel count.

use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};
use crate::probe::probe_audio;
use crate::track::Track;

/// Decode an audio file into a [`Track`].
///
/// The file is probed first so the decoded PCM keeps its native sample
/// rate and channel count; no resampling happens here.
pub async fn decode_track(path: impl AsRef<Path>) -> MediaResult<Track> {
    let path = path.as_ref();
    let info = probe_audio(path).await?;

    debug!(
        path = %path.display(),
        sample_rate = info.sample_rate,
        channels = info.channels,
        duration = info.duration,
        "Decoding audio to raw PCM"
    );

    let raw = NamedTempFile::new()?;

    FfmpegCommand::new(path, raw.path())
        .no_video()
        .sample_rate(info.sample_rate)
        .channels(info.channels)
        .container("f32le")
        .run()
        .await?;

    let bytes = tokio::fs::read(raw.path()).await?;
    if bytes.is_empty() {
        return Err(MediaError::decode_failed("decoder produced no samples"));
    }

    let samples: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    let track = Track::new(samples, info.sample_rate, info.channels);

    debug!(
        frames = track.frames(),
        duration_ms = track.duration_ms(),
        "Decode complete"
    );

    Ok(track)
}
