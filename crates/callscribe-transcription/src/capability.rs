//! External transcription capability contract

use serde::{Deserialize, Serialize};

use callscribe_core::AudioBuffer;

use crate::error::TranscriptionError;

/// One decoded chunk with the quality signals reported by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityChunk {
    /// Decoded text
    pub text: String,
    /// Chunk start in seconds, relative to the transcribed slice
    pub start_s: f64,
    /// Chunk end in seconds, relative to the transcribed slice
    pub end_s: f64,
    /// Mean log-probability of the decoded tokens
    pub avg_logprob: f64,
    /// Compression ratio of the decoded text
    pub compression_ratio: f64,
}

/// One transcription unit: a diarized segment's audio plus its context
#[derive(Debug, Clone)]
pub struct TranscriptionTask {
    /// Stable speaker label of the segment
    pub speaker: String,
    /// Audio slice covering the segment
    pub audio: AudioBuffer,
    /// Segment start in absolute recording time, ms
    pub start_ms: u64,
    /// Segment stop in absolute recording time, ms
    pub stop_ms: u64,
    /// Shared contextual prompt (may be empty)
    pub prompt: String,
}

/// External speech-to-text capability
#[trait_variant::make(TranscriptionCapability: Send)]
pub trait LocalTranscriptionCapability {
    /// Transcribe one audio slice.
    ///
    /// `prompt` biases decoding toward the expected vocabulary; an empty
    /// prompt means unconditioned decoding. The engine returns chunks in
    /// time order or an empty list when it decoded nothing.
    async fn transcribe(
        &self,
        audio: AudioBuffer,
        prompt: &str,
        temperature: f32,
    ) -> Result<Vec<QualityChunk>, TranscriptionError>;
}
