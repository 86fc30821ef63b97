//! Decoded audio tracks.

/// Layout of raw PCM data: sample rate and channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmSpec {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// An immutable decoded audio track.
///
/// Samples are interleaved `f32` values in `[-1.0, 1.0]` at a fixed
/// sample rate and channel count. Transformations produce new tracks;
/// a track is never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl Track {
    /// Create a track from interleaved samples.
    ///
    /// Trailing samples that do not fill a whole frame are dropped so the
    /// track always holds complete frames.
    pub fn new(mut samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        let channels = channels.max(1);
        let remainder = samples.len() % channels as usize;
        if remainder != 0 {
            samples.truncate(samples.len() - remainder);
        }
        Self {
            samples,
            sample_rate: sample_rate.max(1),
            channels,
        }
    }

    /// Interleaved sample data.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// PCM layout of this track.
    pub fn spec(&self) -> PcmSpec {
        PcmSpec {
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }

    /// Number of audio frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Total duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        (self.frames() as u64 * 1000) / self.sample_rate as u64
    }

    /// Frame index for a millisecond offset, clamped to the track length.
    pub fn frame_at_ms(&self, ms: u64) -> usize {
        let frame = (ms as u128 * self.sample_rate as u128 / 1000) as usize;
        frame.min(self.frames())
    }

    /// Sample-accurate extraction of `[start_ms, end_ms)` as a new track.
    pub fn slice_ms(&self, start_ms: u64, end_ms: u64) -> Track {
        let start = self.frame_at_ms(start_ms) * self.channels as usize;
        let end = self.frame_at_ms(end_ms) * self.channels as usize;
        let samples = if start < end {
            self.samples[start..end].to_vec()
        } else {
            Vec::new()
        };
        Track::new(samples, self.sample_rate, self.channels)
    }

    /// Serialize the samples as little-endian `f32` bytes for FFmpeg.
    pub fn to_f32le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.samples.len() * 4);
        for sample in &self.samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono_track(frames: usize, rate: u32) -> Track {
        Track::new(vec![0.25; frames], rate, 1)
    }

    #[test]
    fn test_duration() {
        let track = mono_track(48_000, 48_000);
        assert_eq!(track.duration_ms(), 1000);
        assert_eq!(track.frames(), 48_000);
    }

    #[test]
    fn test_partial_frame_dropped() {
        let track = Track::new(vec![0.0; 7], 1000, 2);
        assert_eq!(track.frames(), 3);
        assert_eq!(track.samples().len(), 6);
    }

    #[test]
    fn test_slice_ms() {
        let track = mono_track(10_000, 1000); // 10s at 1kHz
        let slice = track.slice_ms(2000, 5000);
        assert_eq!(slice.frames(), 3000);
        assert_eq!(slice.duration_ms(), 3000);
    }

    #[test]
    fn test_slice_clamps_past_end() {
        let track = mono_track(1000, 1000);
        let slice = track.slice_ms(500, 5000);
        assert_eq!(slice.frames(), 500);
    }

    #[test]
    fn test_empty_slice() {
        let track = mono_track(1000, 1000);
        let slice = track.slice_ms(800, 800);
        assert_eq!(slice.frames(), 0);
    }

    #[test]
    fn test_f32le_roundtrip() {
        let track = Track::new(vec![0.0, 0.5, -1.0], 8000, 1);
        let bytes = track.to_f32le_bytes();
        assert_eq!(bytes.len(), 12);
        let restored: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        assert_eq!(restored, track.samples());
    }
}
