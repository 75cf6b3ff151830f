//! Decoded audio buffer

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use thiserror::Error;

/// Audio handling errors
#[derive(Error, Debug)]
pub enum AudioError {
    /// File not found
    #[error("Audio file not found: {0}")]
    FileNotFound(String),

    /// Invalid audio format
    #[error("Invalid audio format: {0}")]
    InvalidFormat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// WAV processing error
    #[error("WAV processing error: {0}")]
    Wav(#[from] hound::Error),
}

/// Decoded mono audio, sliceable by millisecond range.
///
/// Slices share the underlying sample storage, so handing each
/// transcription task its own slice is cheap.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    samples: Arc<[f32]>,
    sample_rate: u32,
    start: usize,
    end: usize,
}

impl AudioBuffer {
    /// Create a buffer from raw mono samples
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Self {
        let end = samples.len();
        Self {
            samples: samples.into(),
            sample_rate,
            start: 0,
            end,
        }
    }

    /// Decode a WAV byte stream into a buffer
    ///
    /// Multi-channel input is downmixed to mono by averaging channels.
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self, AudioError> {
        let mut reader = WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(AudioError::Wav)?,
            SampleFormat::Int => {
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max))
                    .collect::<Result<_, _>>()
                    .map_err(AudioError::Wav)?
            }
        };

        let channels = spec.channels as usize;
        if channels == 0 {
            return Err(AudioError::InvalidFormat("zero channels".to_string()));
        }

        let samples = if channels == 1 {
            interleaved
        } else {
            interleaved
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                .collect()
        };

        Ok(Self::from_samples(samples, spec.sample_rate))
    }

    /// Decode a WAV file into a buffer
    pub fn from_wav_file<P: AsRef<Path>>(path: P) -> Result<Self, AudioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AudioError::FileNotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(path)?;
        Self::from_wav_bytes(&bytes)
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Samples covered by this buffer (or slice)
    pub fn samples(&self) -> &[f32] {
        &self.samples[self.start..self.end]
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.len() as u64 * 1000 / self.sample_rate as u64
    }

    /// Slice out `[start_ms, stop_ms)` relative to this buffer.
    ///
    /// The range is clamped to the buffer bounds; no samples are copied.
    pub fn slice_ms(&self, start_ms: u64, stop_ms: u64) -> AudioBuffer {
        let to_sample = |ms: u64| (ms * self.sample_rate as u64 / 1000) as usize;
        let len = self.len();
        let from = to_sample(start_ms).min(len);
        let to = to_sample(stop_ms).clamp(from, len);
        AudioBuffer {
            samples: Arc::clone(&self.samples),
            sample_rate: self.sample_rate,
            start: self.start + from,
            end: self.start + to,
        }
    }

    /// Encode this buffer as a 32-bit float WAV byte stream
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, AudioError> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec)?;
            for &sample in self.samples() {
                writer.write_sample(sample)?;
            }
            writer.finalize()?;
        }
        Ok(cursor.into_inner())
    }
}
