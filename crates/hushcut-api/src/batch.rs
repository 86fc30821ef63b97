//! Batch orchestration: one pipeline run per uploaded file.
//!
//! Files are processed independently and in upload order; one file's
//! failure is captured as its outcome and never aborts or corrupts a
//! sibling's result.

use tempfile::Builder;
use tracing::{info, warn};

use hushcut_media::{decode_track, export_with_budget, trim_silence, AudioEncoder, ExportResult};
use hushcut_models::{file_stem, ExportPolicy, FileOutcome, OutputFormat, SilencePolicy};

/// An uploaded file buffered from the multipart body.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Outcome plus the artifact for a successful file.
pub struct ProcessedFile {
    pub outcome: FileOutcome,
    pub artifact: Option<ExportResult>,
}

impl UploadedFile {
    /// Output format for this file: an explicit request wins, otherwise
    /// the upload keeps its own container (unknown containers fall back
    /// to mp3).
    pub fn output_format(&self, requested: Option<OutputFormat>) -> OutputFormat {
        requested.unwrap_or_else(|| {
            self.filename
                .rsplit_once('.')
                .map(|(_, ext)| OutputFormat::parse_or_default(ext))
                .unwrap_or_default()
        })
    }
}

/// Run the trim/export pipeline for every uploaded file.
pub async fn process_batch(
    files: Vec<UploadedFile>,
    policy: &SilencePolicy,
    requested_format: Option<OutputFormat>,
    export: &ExportPolicy,
    encoder: &dyn AudioEncoder,
) -> Vec<ProcessedFile> {
    let mut results = Vec::with_capacity(files.len());

    for file in files {
        let filename = file.filename.clone();
        let format = file.output_format(requested_format);
        match process_one(file, policy, format, export, encoder).await {
            Ok((output_name, artifact)) => {
                results.push(ProcessedFile {
                    outcome: FileOutcome::ok(filename, output_name, artifact.bytes),
                    artifact: Some(artifact),
                });
            }
            Err(error) => {
                warn!(filename = %filename, error = %error, "File failed to process");
                results.push(ProcessedFile {
                    outcome: FileOutcome::failed(filename, error),
                    artifact: None,
                });
            }
        }
    }

    results
}

/// Process one file: persist, decode, trim, export.
async fn process_one(
    file: UploadedFile,
    policy: &SilencePolicy,
    format: OutputFormat,
    export: &ExportPolicy,
    encoder: &dyn AudioEncoder,
) -> Result<(String, ExportResult), String> {
    // Keep the extension so FFmpeg demuxer hints stay intact
    let suffix = file
        .filename
        .rsplit_once('.')
        .map(|(_, ext)| format!(".{}", ext))
        .unwrap_or_default();

    let input = Builder::new()
        .suffix(&suffix)
        .tempfile()
        .map_err(|e| format!("Failed to stage upload: {}", e))?;

    tokio::fs::write(input.path(), &file.data)
        .await
        .map_err(|e| format!("Failed to stage upload: {}", e))?;

    let track = decode_track(input.path())
        .await
        .map_err(|e| format!("Decode failed: {}", e))?;

    let trimmed = trim_silence(&track, policy);

    info!(
        filename = %file.filename,
        original_ms = trimmed.original_ms,
        trimmed_ms = trimmed.trimmed_ms,
        passthrough = trimmed.is_passthrough(),
        "Trimmed upload"
    );

    let artifact = export_with_budget(&trimmed.track, format, export, encoder)
        .await
        .map_err(|e| format!("Export failed: {}", e))?;

    let output_name = format!("{}_processed.{}", file_stem(&file.filename), format.extension());

    Ok((output_name, artifact))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hushcut_media::FfmpegEncoder;

    // These tests feed unparseable bytes, so they exercise failure
    // containment without needing a real codec on the machine.

    #[tokio::test]
    async fn test_failures_contained_per_file_in_order() {
        let files = vec![
            UploadedFile {
                filename: "a.wav".to_string(),
                data: b"not audio".to_vec(),
            },
            UploadedFile {
                filename: "b.mp3".to_string(),
                data: b"also not audio".to_vec(),
            },
        ];

        let results = process_batch(
            files,
            &SilencePolicy::default(),
            Some(OutputFormat::Mp3),
            &ExportPolicy::default(),
            &FfmpegEncoder,
        )
        .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].outcome.source_filename, "a.wav");
        assert_eq!(results[1].outcome.source_filename, "b.mp3");
        for result in &results {
            assert!(!result.outcome.success);
            assert!(result.artifact.is_none());
            assert!(result
                .outcome
                .error
                .as_ref()
                .is_some_and(|e| !e.is_empty()));
        }
    }

    #[tokio::test]
    async fn test_empty_batch_yields_no_outcomes() {
        let results = process_batch(
            Vec::new(),
            &SilencePolicy::default(),
            None,
            &ExportPolicy::default(),
            &FfmpegEncoder,
        )
        .await;
        assert!(results.is_empty());
    }

    #[test]
    fn test_output_format_resolution() {
        let upload = UploadedFile {
            filename: "talk.wav".to_string(),
            data: Vec::new(),
        };

        // No explicit request keeps the upload's container
        assert_eq!(upload.output_format(None), OutputFormat::Wav);
        // An explicit request wins
        assert_eq!(
            upload.output_format(Some(OutputFormat::Ogg)),
            OutputFormat::Ogg
        );

        // Containers outside the output allow-list fall back to mp3
        let exotic = UploadedFile {
            filename: "talk.aiff".to_string(),
            data: Vec::new(),
        };
        assert_eq!(exotic.output_format(None), OutputFormat::Mp3);
    }
}
