//! In-memory job store for the async polling facade.
//!
//! One mutex guards the whole table so status reads and writes can never
//! race with the worker that completes a job. All transitions go through
//! explicit methods; there is no direct map access from handlers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

use hushcut_models::{JobId, JobRecord, JobStatus, OutputFormat};

/// A finished artifact held for single delivery.
///
/// The temporary file is deleted when the entry is dropped, so an
/// undelivered artifact never outlives its job record.
pub struct CompletedOutput {
    /// The encoded artifact on disk.
    pub file: NamedTempFile,
    /// Encoded size in bytes.
    pub bytes: u64,
    /// Output format, for response headers.
    pub format: OutputFormat,
    /// Attachment filename offered to the client.
    pub download_name: String,
}

struct JobEntry {
    record: JobRecord,
    output: Option<CompletedOutput>,
}

/// What a status poll observed.
pub enum JobPoll {
    /// Job is pending or processing; the record stays in the table.
    InProgress(JobRecord),
    /// Job completed; record and artifact are removed (single delivery).
    Completed(JobRecord, CompletedOutput),
    /// Job failed; record is removed (single delivery).
    Failed(JobRecord),
}

/// Concurrency-safe key-value store of jobs.
#[derive(Clone, Default)]
pub struct JobStore {
    inner: Arc<Mutex<HashMap<JobId, JobEntry>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pending job for an uploaded file.
    pub fn create_pending(&self, filename: impl Into<String>) -> JobRecord {
        let record = JobRecord::pending(filename);
        let mut jobs = self.inner.lock().expect("job table poisoned");
        jobs.insert(
            record.job_id.clone(),
            JobEntry {
                record: record.clone(),
                output: None,
            },
        );
        record
    }

    /// Transition a job to processing.
    pub fn mark_processing(&self, job_id: &JobId) {
        let mut jobs = self.inner.lock().expect("job table poisoned");
        if let Some(entry) = jobs.get_mut(job_id) {
            entry.record.status = JobStatus::Processing;
        }
    }

    /// Transition a job to completed with its artifact.
    pub fn mark_completed(&self, job_id: &JobId, output: CompletedOutput) {
        let mut jobs = self.inner.lock().expect("job table poisoned");
        if let Some(entry) = jobs.get_mut(job_id) {
            entry.record.status = JobStatus::Completed;
            entry.record.completed_at = Some(chrono::Utc::now());
            entry.output = Some(output);
        }
    }

    /// Transition a job to failed.
    pub fn mark_failed(&self, job_id: &JobId, error: impl Into<String>) {
        let mut jobs = self.inner.lock().expect("job table poisoned");
        if let Some(entry) = jobs.get_mut(job_id) {
            entry.record.status = JobStatus::Failed;
            entry.record.completed_at = Some(chrono::Utc::now());
            entry.record.error = Some(error.into());
        }
    }

    /// Poll a job, removing it on first delivery of a terminal state.
    pub fn poll(&self, job_id: &JobId) -> Option<JobPoll> {
        let mut jobs = self.inner.lock().expect("job table poisoned");

        let terminal = jobs
            .get(job_id)
            .map(|entry| entry.record.status.is_terminal())?;

        if !terminal {
            return jobs
                .get(job_id)
                .map(|entry| JobPoll::InProgress(entry.record.clone()));
        }

        let entry = jobs.remove(job_id)?;
        match entry.record.status {
            JobStatus::Completed => {
                let output = entry.output?;
                Some(JobPoll::Completed(entry.record, output))
            }
            _ => Some(JobPoll::Failed(entry.record)),
        }
    }

    /// Number of jobs still pending or processing, for `/health`.
    pub fn active_count(&self) -> usize {
        let jobs = self.inner.lock().expect("job table poisoned");
        jobs.values()
            .filter(|entry| entry.record.status.is_active())
            .count()
    }
}
