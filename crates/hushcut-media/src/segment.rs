//! Amplitude-threshold silence segmentation.
//!
//! The segmenter scans the loudness profile chronologically and merges
//! contiguous silent windows into runs. A run only splits the audio when
//! it lasts at least `min_silence_ms`; shorter dips are absorbed into the
//! surrounding material, which is what lets brief pauses inside words
//! survive.

use hushcut_models::{NonSilentRange, PaddedRange, SilencePolicy};

use crate::profile::LoudnessWindow;

/// Detect non-silent ranges in a loudness profile.
///
/// Returns ranges that are mutually non-overlapping and strictly
/// increasing in start time. An entirely loud profile yields a single
/// range spanning the whole track; an entirely silent profile yields an
/// empty list, and the caller falls back to the original track.
pub fn detect_nonsilent(windows: &[LoudnessWindow], policy: &SilencePolicy) -> Vec<NonSilentRange> {
    let mut ranges = Vec::new();
    // Start of the non-silent material currently being accumulated
    let mut sound_start: Option<u64> = None;
    // Start of the silent run currently being tracked
    let mut silence_start: Option<u64> = None;
    let mut profile_end = 0u64;

    for window in windows {
        profile_end = window.end_ms;
        let silent = window.level_dbfs < policy.silence_thresh_dbfs;

        if silent {
            silence_start.get_or_insert(window.start_ms);
            continue;
        }

        if let Some(run_start) = silence_start.take() {
            let run_ms = window.start_ms.saturating_sub(run_start);
            if run_ms >= policy.min_silence_ms {
                // Qualifying gap: close the current range at the gap start
                if let Some(start) = sound_start.take() {
                    if run_start > start {
                        ranges.push(NonSilentRange::new(start, run_start));
                    }
                }
            } else if sound_start.is_none() {
                // Short leading silence is absorbed into the material
                sound_start = Some(run_start);
            }
        }

        sound_start.get_or_insert(window.start_ms);
    }

    // Close the final range, trimming a qualifying trailing silent run
    if let Some(start) = sound_start {
        let end = match silence_start {
            Some(run_start)
                if profile_end.saturating_sub(run_start) >= policy.min_silence_ms =>
            {
                run_start
            }
            _ => profile_end,
        };
        if end > start {
            ranges.push(NonSilentRange::new(start, end));
        }
    }

    ranges
}

/// Expand ranges by the keep-silence padding, clamped to the track.
///
/// Overlapping padded ranges are deliberately NOT merged: each range is
/// assembled independently in order, so overlapping padding is emitted
/// on both sides of a short gap.
pub fn pad_ranges(
    ranges: &[NonSilentRange],
    policy: &SilencePolicy,
    track_duration_ms: u64,
) -> Vec<PaddedRange> {
    ranges
        .iter()
        .map(|r| r.padded(policy.keep_silence_ms, track_duration_ms))
        .collect()
}
