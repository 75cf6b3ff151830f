//! Fixed-length audio windowing
//!
//! The external diarization engine degrades (or times out) on very long
//! inputs, so the recording is cut into fixed windows that can be
//! dispatched in parallel. A window boundary may split an utterance;
//! speaker reconciliation compensates for that downstream.

use crate::audio::AudioBuffer;

/// Default window length (5 minutes)
pub const DEFAULT_WINDOW_MS: u64 = 300_000;

/// One fixed-length cut of the recording
#[derive(Debug, Clone)]
pub struct Window {
    /// Offset of this window from the start of the recording, in ms
    pub offset_ms: u64,
    /// Audio covered by this window
    pub audio: AudioBuffer,
}

/// Cut a recording into consecutive windows of `window_ms` milliseconds.
///
/// The windows partition the buffer end-to-end with no gaps or overlaps;
/// the last window may be shorter. An empty buffer yields no windows.
pub fn windows(audio: &AudioBuffer, window_ms: u64) -> impl Iterator<Item = Window> + '_ {
    assert!(window_ms > 0, "window length must be positive");
    let total_ms = audio.duration_ms();
    (0..total_ms).step_by(window_ms as usize).map(move |offset_ms| {
        let stop_ms = (offset_ms + window_ms).min(total_ms);
        Window {
            offset_ms,
            audio: audio.slice_ms(offset_ms, stop_ms),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_of(duration_ms: u64) -> AudioBuffer {
        let samples = vec![0.0f32; (duration_ms * 16) as usize];
        AudioBuffer::from_samples(samples, 16_000)
    }

    #[test]
    fn test_windows_partition_the_buffer() {
        let audio = buffer_of(720_000);
        let cut: Vec<Window> = windows(&audio, DEFAULT_WINDOW_MS).collect();

        assert_eq!(cut.len(), 3);
        let offsets: Vec<u64> = cut.iter().map(|w| w.offset_ms).collect();
        assert_eq!(offsets, vec![0, 300_000, 600_000]);

        // No gaps, no overlaps: offsets are running sums of prior lengths
        let mut covered = 0;
        for window in &cut {
            assert_eq!(window.offset_ms, covered);
            covered += window.audio.duration_ms();
        }
        assert_eq!(covered, 720_000);
    }

    #[test]
    fn test_last_window_is_shorter() {
        let audio = buffer_of(650_000);
        let cut: Vec<Window> = windows(&audio, DEFAULT_WINDOW_MS).collect();

        assert_eq!(cut.len(), 3);
        assert_eq!(cut[2].offset_ms, 600_000);
        assert_eq!(cut[2].audio.duration_ms(), 50_000);
    }

    #[test]
    fn test_empty_buffer_yields_no_windows() {
        let audio = AudioBuffer::from_samples(vec![], 16_000);
        assert_eq!(windows(&audio, DEFAULT_WINDOW_MS).count(), 0);
    }

    #[test]
    fn test_short_buffer_yields_single_window() {
        let audio = buffer_of(42_000);
        let cut: Vec<Window> = windows(&audio, DEFAULT_WINDOW_MS).collect();
        assert_eq!(cut.len(), 1);
        assert_eq!(cut[0].offset_ms, 0);
        assert_eq!(cut[0].audio.duration_ms(), 42_000);
    }
}
