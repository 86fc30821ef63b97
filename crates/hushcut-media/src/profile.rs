//! Per-window loudness profiling.
//!
//! The profiler reduces a decoded track to a sequence of fixed-size
//! windows, each carrying an RMS level in dBFS. The window must be small
//! enough to resolve gaps shorter than the minimum silence length, so it
//! is fixed at 10 ms.

use crate::track::Track;

/// Scan window size in milliseconds.
pub const WINDOW_MS: u64 = 10;

/// Sentinel level for digital silence, standing in for -inf dBFS.
pub const SILENCE_FLOOR_DBFS: f64 = -120.0;

/// Loudness of one scan window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoudnessWindow {
    /// Window start in milliseconds (inclusive).
    pub start_ms: u64,
    /// Window end in milliseconds (exclusive).
    pub end_ms: u64,
    /// RMS level in dBFS, clamped at [`SILENCE_FLOOR_DBFS`].
    pub level_dbfs: f64,
}

/// Compute the loudness profile of a track.
///
/// Windows cover `[0, duration)` contiguously with no gaps; the final
/// window may be shorter than [`WINDOW_MS`]. Pure function of the track:
/// identical input always yields the identical profile.
pub fn profile_loudness(track: &Track) -> Vec<LoudnessWindow> {
    let duration_ms = track.duration_ms();
    if duration_ms == 0 {
        return Vec::new();
    }

    let samples = track.samples();
    let channels = track.channels() as usize;
    let sample_rate = track.sample_rate() as u64;
    let frames_per_window = (sample_rate * WINDOW_MS / 1000).max(1) as usize;
    let samples_per_window = frames_per_window * channels;

    let mut windows = Vec::with_capacity(samples.len() / samples_per_window + 1);
    let mut frame = 0u64;

    // Window boundaries are derived from frame offsets, not accumulated
    // in ms. At rates not divisible by 100 a window spans slightly less
    // than WINDOW_MS, and accumulating would let the labels drift ahead
    // of the samples and leave the tail of the track unprofiled.
    for chunk in samples.chunks(samples_per_window) {
        let chunk_frames = (chunk.len() / channels) as u64;
        let start_ms = frame * 1000 / sample_rate;
        let end_ms = (frame + chunk_frames) * 1000 / sample_rate;
        windows.push(LoudnessWindow {
            start_ms,
            end_ms,
            level_dbfs: rms_dbfs(chunk),
        });
        frame += chunk_frames;
    }

    windows
}

/// RMS level of interleaved samples in dBFS, full scale 1.0.
fn rms_dbfs(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return SILENCE_FLOOR_DBFS;
    }

    let sum_sq: f64 = samples.iter().map(|s| (*s as f64) * (*s as f64)).sum();
    let rms = (sum_sq / samples.len() as f64).sqrt();

    if rms <= 0.0 {
        SILENCE_FLOOR_DBFS
    } else {
        (20.0 * rms.log10()).max(SILENCE_FLOOR_DBFS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_of(samples: Vec<f32>, rate: u32) -> Track {
        Track::new(samples, rate, 1)
    }

    #[test]
    fn test_windows_cover_track_without_gaps() {
        // 1005ms at 1kHz -> 100 full windows plus one 5ms tail
        let track = track_of(vec![0.5; 1005], 1000);
        let windows = profile_loudness(&track);

        assert_eq!(windows.first().unwrap().start_ms, 0);
        assert_eq!(windows.last().unwrap().end_ms, 1005);
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end_ms, pair[1].start_ms, "no gaps between windows");
        }
    }

    #[test]
    fn test_digital_silence_hits_floor() {
        let track = track_of(vec![0.0; 1000], 1000);
        let windows = profile_loudness(&track);
        assert!(windows
            .iter()
            .all(|w| (w.level_dbfs - SILENCE_FLOOR_DBFS).abs() < f64::EPSILON));
    }

    #[test]
    fn test_full_scale_is_zero_dbfs() {
        let track = track_of(vec![1.0; 1000], 1000);
        let windows = profile_loudness(&track);
        assert!(windows.iter().all(|w| w.level_dbfs.abs() < 0.01));
    }

    #[test]
    fn test_half_scale_level() {
        // RMS 0.5 -> 20*log10(0.5) ~= -6.02 dBFS
        let track = track_of(vec![0.5; 1000], 1000);
        let windows = profile_loudness(&track);
        assert!((windows[0].level_dbfs - (-6.02)).abs() < 0.05);
    }

    #[test]
    fn test_non_divisible_rate_profiles_every_sample() {
        // 22050 Hz is not divisible by 100, so each window holds 220
        // frames, slightly under 10ms. The profile must still reach the
        // end of the track with no gaps.
        let mut samples = vec![0.0f32; 2 * 22050];
        let burst = 22050 * 130 / 1000; // final 130ms is loud
        let len = samples.len();
        samples[len - burst..].fill(0.5);
        let track = track_of(samples, 22050);

        let windows = profile_loudness(&track);

        assert_eq!(windows.first().unwrap().start_ms, 0);
        assert_eq!(windows.last().unwrap().end_ms, track.duration_ms());
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end_ms, pair[1].start_ms, "no gaps between windows");
        }
        // The trailing burst registers as loud, not as unexamined tail
        assert!(windows.iter().rev().take(5).all(|w| w.level_dbfs > -45.0));
    }

    #[test]
    fn test_deterministic() {
        let track = track_of((0..4410).map(|i| (i as f32 * 0.001).sin()).collect(), 44100);
        let a = profile_loudness(&track);
        let b = profile_loudness(&track);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_track() {
        let track = track_of(Vec::new(), 44100);
        assert!(profile_loudness(&track).is_empty());
    }
}
