//! Zip bundling for multi-file responses.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use hushcut_models::ProcessingSummary;

use crate::batch::ProcessedFile;
use crate::error::{ApiError, ApiResult};

/// Name of the machine-readable summary entry inside the archive.
pub const SUMMARY_ENTRY: &str = "processing_summary.json";

/// Bundle every successful artifact plus the processing summary into a
/// zip archive held in memory.
///
/// The archive is built regardless of how many files failed, as long as
/// the caller verified at least one success. A failure here is terminal
/// for the whole response; the per-file artifacts are dropped with the
/// `ProcessedFile` values, which reclaims their temp storage.
pub async fn build_archive(
    processed: &[ProcessedFile],
    summary: &ProcessingSummary,
) -> ApiResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for file in processed {
        let (Some(artifact), Some(name)) = (&file.artifact, &file.outcome.output_name) else {
            continue;
        };

        let data = tokio::fs::read(artifact.file.path())
            .await
            .map_err(|e| ApiError::internal(format!("Failed to read artifact: {}", e)))?;

        writer
            .start_file(name.as_str(), options)
            .map_err(|e| ApiError::internal(format!("Archive write failed: {}", e)))?;
        writer
            .write_all(&data)
            .map_err(|e| ApiError::internal(format!("Archive write failed: {}", e)))?;
    }

    let summary_json = serde_json::to_vec_pretty(summary)
        .map_err(|e| ApiError::internal(format!("Summary serialization failed: {}", e)))?;

    writer
        .start_file(SUMMARY_ENTRY, options)
        .map_err(|e| ApiError::internal(format!("Archive write failed: {}", e)))?;
    writer
        .write_all(&summary_json)
        .map_err(|e| ApiError::internal(format!("Archive write failed: {}", e)))?;

    let cursor = writer
        .finish()
        .map_err(|e| ApiError::internal(format!("Archive finish failed: {}", e)))?;

    Ok(cursor.into_inner())
}
