//! Time ranges produced by the silence segmenter.

use serde::{Deserialize, Serialize};

/// A half-open `[start_ms, end_ms)` interval classified as containing
/// audible content.
///
/// Ranges in a segmenter result are mutually non-overlapping and strictly
/// increasing in start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonSilentRange {
    /// Start time in milliseconds (inclusive).
    pub start_ms: u64,
    /// End time in milliseconds (exclusive).
    pub end_ms: u64,
}

impl NonSilentRange {
    /// Create a new range. Start must precede end.
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        debug_assert!(start_ms < end_ms, "range must have positive duration");
        Self { start_ms, end_ms }
    }

    /// Duration of this range in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Expand by `padding_ms` on each side, clamped to `[0, track_ms]`.
    pub fn padded(&self, padding_ms: u64, track_ms: u64) -> PaddedRange {
        PaddedRange {
            start_ms: self.start_ms.saturating_sub(padding_ms),
            end_ms: (self.end_ms + padding_ms).min(track_ms),
        }
    }
}

/// A [`NonSilentRange`] after keep-silence padding has been applied.
///
/// Adjacent padded ranges may overlap after expansion. They are still
/// assembled independently in range order; the overlapping padding is
/// emitted on both sides. That duplication is the documented behavior of
/// concatenating independently cut chunks, not something to merge away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddedRange {
    /// Start time in milliseconds (inclusive).
    pub start_ms: u64,
    /// End time in milliseconds (exclusive).
    pub end_ms: u64,
}

impl PaddedRange {
    /// Duration of this range in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_clamps_to_track() {
        let range = NonSilentRange::new(10, 990);
        let padded = range.padded(30, 1000);
        assert_eq!(padded.start_ms, 0);
        assert_eq!(padded.end_ms, 1000);
    }

    #[test]
    fn test_padding_interior() {
        let range = NonSilentRange::new(500, 700);
        let padded = range.padded(30, 10_000);
        assert_eq!(padded.start_ms, 470);
        assert_eq!(padded.end_ms, 730);
        assert_eq!(padded.duration_ms(), 260);
    }
}
