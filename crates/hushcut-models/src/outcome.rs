//! Per-file processing outcomes and batch summaries.

use serde::{Deserialize, Serialize};

/// Result of processing a single uploaded file.
///
/// One outcome is created per input file by the batch orchestrator; a
/// failure here never aborts the rest of the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    /// Original uploaded filename.
    pub source_filename: String,
    /// Whether the pipeline completed for this file.
    pub success: bool,
    /// Error detail when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Name of the produced artifact inside the archive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
    /// Size of the produced artifact in bytes (0 on failure).
    pub output_bytes: u64,
}

impl FileOutcome {
    /// Record a successful outcome.
    pub fn ok(source: impl Into<String>, output_name: impl Into<String>, bytes: u64) -> Self {
        Self {
            source_filename: source.into(),
            success: true,
            error: None,
            output_name: Some(output_name.into()),
            output_bytes: bytes,
        }
    }

    /// Record a failed outcome.
    pub fn failed(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source_filename: source.into(),
            success: false,
            error: Some(error.into()),
            output_name: None,
            output_bytes: 0,
        }
    }
}

/// Machine-readable summary bundled as `processing_summary.json` in
/// multi-file archive responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingSummary {
    /// Number of uploaded files.
    pub total_files: usize,
    /// Number of files that processed successfully.
    pub succeeded: usize,
    /// Number of files that failed.
    pub failed: usize,
    /// Per-file results in original upload order.
    pub files: Vec<FileOutcome>,
}

impl ProcessingSummary {
    /// Build a summary from per-file outcomes.
    pub fn from_outcomes(files: Vec<FileOutcome>) -> Self {
        let succeeded = files.iter().filter(|f| f.success).count();
        Self {
            total_files: files.len(),
            succeeded,
            failed: files.len() - succeeded,
            files,
        }
    }

    /// Whether at least one file succeeded.
    pub fn any_success(&self) -> bool {
        self.succeeded > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let summary = ProcessingSummary::from_outcomes(vec![
            FileOutcome::ok("a.wav", "a_processed.mp3", 1024),
            FileOutcome::failed("b.wav", "decode failed"),
            FileOutcome::ok("c.wav", "c_processed.mp3", 2048),
        ]);

        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert!(summary.any_success());
        // Outcomes stay in upload order
        assert_eq!(summary.files[1].source_filename, "b.wav");
        assert!(summary.files[1].error.is_some());
    }

    #[test]
    fn test_all_failed() {
        let summary =
            ProcessingSummary::from_outcomes(vec![FileOutcome::failed("a.wav", "boom")]);
        assert!(!summary.any_success());
    }
}
