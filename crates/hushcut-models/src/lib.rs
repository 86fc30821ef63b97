//! Shared data models for the HushCut audio service.
//!
//! This crate provides Serde-serializable types for:
//! - Silence detection and export policy
//! - Time ranges produced by the segmenter
//! - Output formats and their codec mappings
//! - Per-file processing outcomes and batch summaries
//! - Async job records

pub mod format;
pub mod job;
pub mod outcome;
pub mod policy;
pub mod range;

// Re-export common types
pub use format::{file_stem, is_allowed_input, OutputFormat, ALLOWED_INPUT_EXTENSIONS};
pub use job::{JobId, JobRecord, JobStatus};
pub use outcome::{FileOutcome, ProcessingSummary};
pub use policy::{ExportPolicy, SilencePolicy};
pub use range::{NonSilentRange, PaddedRange};
