//! FFmpeg CLI wrapper and the silence-trimming pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg/FFprobe command building
//! - Decoding uploads into raw PCM tracks
//! - Per-window loudness profiling in dBFS
//! - Amplitude-threshold silence segmentation with keep-silence padding
//! - Sample-accurate clip assembly
//! - Size-bounded export with a descending bitrate search

pub mod assemble;
pub mod command;
pub mod decode;
pub mod error;
pub mod export;
pub mod probe;
pub mod profile;
pub mod segment;
pub mod track;

pub use assemble::{assemble, trim_silence, TrimOutcome};
pub use command::FfmpegCommand;
pub use decode::decode_track;
pub use error::{MediaError, MediaResult};
pub use export::{export_with_budget, AudioEncoder, EncodeSettings, ExportResult, FfmpegEncoder};
pub use probe::{probe_audio, AudioInfo};
pub use profile::{profile_loudness, LoudnessWindow, SILENCE_FLOOR_DBFS, WINDOW_MS};
pub use segment::{detect_nonsilent, pad_ranges};
pub use track::{PcmSpec, Track};
