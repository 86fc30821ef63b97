//! FFprobe audio information.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::command::check_ffprobe;
use crate::error::{MediaError, MediaResult};

/// Audio file information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioInfo {
    /// Duration in seconds
    pub duration: f64,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count
    pub channels: u16,
    /// Audio codec
    pub codec: String,
    /// File size in bytes
    pub size: u64,
    /// Bitrate in bits/second
    pub bitrate: u64,
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    size: Option<String>,
    bit_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u16>,
}

/// Probe an audio file for information.
pub async fn probe_audio(path: impl AsRef<Path>) -> MediaResult<AudioInfo> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    check_ffprobe()?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::FfprobeFailed {
            message: "FFprobe failed".to_string(),
            stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
        });
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;

    // Find audio stream
    let audio_stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "audio")
        .ok_or(MediaError::NoAudioStream)?;

    // Parse duration
    let duration = probe
        .format
        .duration
        .as_ref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    // Parse size
    let size = probe
        .format
        .size
        .as_ref()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    // Parse bitrate
    let bitrate = probe
        .format
        .bit_rate
        .as_ref()
        .and_then(|b| b.parse::<u64>().ok())
        .unwrap_or(0);

    let sample_rate = audio_stream
        .sample_rate
        .as_ref()
        .and_then(|r| r.parse::<u32>().ok())
        .ok_or_else(|| MediaError::InvalidAudio("missing sample rate".to_string()))?;

    Ok(AudioInfo {
        duration,
        sample_rate,
        channels: audio_stream.channels.unwrap_or(1).max(1),
        codec: audio_stream.codec_name.clone().unwrap_or_default(),
        size,
        bitrate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_json() {
        let json = r#"{
            "format": {"duration": "10.5", "size": "168000", "bit_rate": "128000"},
            "streams": [
                {"codec_type": "audio", "codec_name": "pcm_s16le", "sample_rate": "44100", "channels": 2}
            ]
        }"#;

        let probe: FfprobeOutput = serde_json::from_str(json).unwrap();
        assert_eq!(probe.streams.len(), 1);
        assert_eq!(probe.streams[0].channels, Some(2));
        assert_eq!(probe.format.duration.as_deref(), Some("10.5"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = probe_audio("/definitely/not/here.wav").await.unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
