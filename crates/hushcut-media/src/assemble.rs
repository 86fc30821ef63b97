//! Sample-accurate clip assembly.

use tracing::{debug, info};

use hushcut_models::{PaddedRange, SilencePolicy};

use crate::profile::profile_loudness;
use crate::segment::{detect_nonsilent, pad_ranges};
use crate::track::Track;

/// Result of running the full trim pipeline on one track.
#[derive(Debug, Clone)]
pub struct TrimOutcome {
    /// The assembled output track.
    pub track: Track,
    /// The padded ranges that were concatenated.
    pub ranges: Vec<PaddedRange>,
    /// Input duration in milliseconds.
    pub original_ms: u64,
    /// Output duration in milliseconds.
    pub trimmed_ms: u64,
}

impl TrimOutcome {
    /// Whether the pipeline fell back to the unmodified input.
    pub fn is_passthrough(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Concatenate the sample data covered by each padded range, in order.
///
/// Concatenation is sample-accurate with no resampling and no crossfade;
/// an audible discontinuity at each splice point is documented behavior.
/// An empty range list returns the original track unchanged (the
/// all-silent fallback propagated from the segmenter).
pub fn assemble(track: &Track, ranges: &[PaddedRange]) -> Track {
    if ranges.is_empty() {
        return track.clone();
    }

    let channels = track.channels() as usize;
    let total_frames: usize = ranges
        .iter()
        .map(|r| track.frame_at_ms(r.end_ms) - track.frame_at_ms(r.start_ms))
        .sum();

    let mut samples = Vec::with_capacity(total_frames * channels);
    for range in ranges {
        let piece = track.slice_ms(range.start_ms, range.end_ms);
        samples.extend_from_slice(piece.samples());
    }

    Track::new(samples, track.sample_rate(), track.channels())
}

/// Run the full trim pipeline: profile, segment, pad, assemble.
pub fn trim_silence(track: &Track, policy: &SilencePolicy) -> TrimOutcome {
    let original_ms = track.duration_ms();

    let windows = profile_loudness(track);
    let ranges = detect_nonsilent(&windows, policy);

    if ranges.is_empty() {
        info!(
            duration_ms = original_ms,
            "No non-silent ranges found, returning original track"
        );
        return TrimOutcome {
            track: track.clone(),
            ranges: Vec::new(),
            original_ms,
            trimmed_ms: original_ms,
        };
    }

    let padded = pad_ranges(&ranges, policy, original_ms);
    debug!(ranges = padded.len(), "Assembling non-silent ranges");

    let assembled = assemble(track, &padded);
    let trimmed_ms = assembled.duration_ms();

    info!(
        original_ms,
        trimmed_ms,
        removed_ms = original_ms.saturating_sub(trimmed_ms),
        ranges = padded.len(),
        "Silence trim complete"
    );

    TrimOutcome {
        track: assembled,
        ranges: padded,
        original_ms,
        trimmed_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a mono track at 1kHz from (duration_ms, amplitude) spans.
    fn track_of(spans: &[(u64, f32)]) -> Track {
        let mut samples = Vec::new();
        for &(ms, amp) in spans {
            samples.extend(std::iter::repeat(amp).take(ms as usize));
        }
        Track::new(samples, 1000, 1)
    }

    #[test]
    fn test_assemble_concatenates_in_order() {
        let track = track_of(&[(1000, 0.1), (1000, 0.5)]);
        let ranges = vec![
            PaddedRange { start_ms: 0, end_ms: 200 },
            PaddedRange { start_ms: 1000, end_ms: 1300 },
        ];

        let out = assemble(&track, &ranges);
        assert_eq!(out.duration_ms(), 500);
        assert!((out.samples()[0] - 0.1).abs() < f32::EPSILON);
        assert!((out.samples()[450] - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_ranges_returns_original() {
        let track = track_of(&[(2000, 0.0)]);
        let out = assemble(&track, &[]);
        assert_eq!(out, track);
    }

    #[test]
    fn test_overlapping_ranges_duplicate_samples() {
        let track = track_of(&[(1000, 0.3)]);
        let ranges = vec![
            PaddedRange { start_ms: 0, end_ms: 600 },
            PaddedRange { start_ms: 500, end_ms: 1000 },
        ];

        // Each range is cut independently, so the 100ms overlap is
        // emitted twice.
        let out = assemble(&track, &ranges);
        assert_eq!(out.duration_ms(), 1100);
    }

    #[test]
    fn test_fully_silent_track_passthrough() {
        let track = track_of(&[(3000, 0.0)]);
        let outcome = trim_silence(&track, &SilencePolicy::default());

        assert!(outcome.is_passthrough());
        assert_eq!(outcome.track, track);
        assert_eq!(outcome.trimmed_ms, 3000);
    }

    #[test]
    fn test_trim_two_bursts() {
        // 3s loud, 1s digital silence, 3s loud, 3s digital silence
        let track = track_of(&[(3000, 0.5), (1000, 0.0), (3000, 0.5), (3000, 0.0)]);
        let outcome = trim_silence(&track, &SilencePolicy::default());

        assert_eq!(outcome.ranges.len(), 2);
        assert_eq!(outcome.original_ms, 10_000);
        // Two 3s bursts plus padding on interior edges, clamped at 0
        let expected = outcome.ranges.iter().map(|r| r.duration_ms()).sum::<u64>();
        assert_eq!(outcome.trimmed_ms, expected);
        assert!(outcome.trimmed_ms >= 6000 && outcome.trimmed_ms <= 6120);
    }

    #[test]
    fn test_trailing_burst_survives_at_odd_rate() {
        // 1s loud, 1s silence, 130ms loud tail at 22050 Hz. The tail
        // sits past the point where ms-accumulated window labels would
        // run out, so it must still come back as its own range.
        let mut samples = vec![0.5f32; 22050];
        samples.extend(std::iter::repeat(0.0f32).take(22050));
        samples.extend(std::iter::repeat(0.5f32).take(22050 * 130 / 1000));
        let track = Track::new(samples, 22050, 1);

        let outcome = trim_silence(&track, &SilencePolicy::default());

        assert_eq!(outcome.ranges.len(), 2);
        let last = outcome.ranges.last().unwrap();
        assert_eq!(last.end_ms, track.duration_ms());
        assert!(last.start_ms < track.duration_ms() - 100);
    }

    #[test]
    fn test_pipeline_deterministic() {
        let track = track_of(&[(500, 0.4), (100, 0.0), (500, 0.4)]);
        let policy = SilencePolicy::default();

        let a = trim_silence(&track, &policy);
        let b = trim_silence(&track, &policy);

        assert_eq!(a.ranges, b.ranges);
        assert_eq!(a.trimmed_ms, b.trimmed_ms);
        assert_eq!(a.track, b.track);
    }
}
