//! External diarization capability contract

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use callscribe_core::AudioBuffer;

use crate::error::DiarizationError;

/// One speaker turn inside a single window
///
/// Times are relative to the window start; the speaker label is only
/// unique within the window that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiarizedSegment {
    /// Start time in ms from the window start
    pub start_ms: u64,
    /// Stop time in ms from the window start
    pub stop_ms: u64,
    /// Window-local speaker label
    pub speaker: String,
}

/// Diarization result for one window, as returned by the engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDiarization {
    /// Speaker turns, window-relative
    pub segments: Vec<DiarizedSegment>,
    /// Representative embedding vector per window-local speaker label
    pub embeddings: HashMap<String, Vec<f32>>,
}

/// A raw result paired back to the window that produced it
#[derive(Debug, Clone)]
pub struct WindowDiarization {
    /// Offset of the originating window, in ms
    pub offset_ms: u64,
    /// The engine's result for that window
    pub raw: RawDiarization,
}

/// External diarization capability
///
/// Implementations call out to a remote inference engine; a non-success
/// status or malformed body surfaces as an error, which the orchestrator
/// treats as a dropped window.
#[trait_variant::make(DiarizationCapability: Send)]
pub trait LocalDiarizationCapability {
    /// Diarize one audio window
    async fn diarize(&self, audio: AudioBuffer) -> Result<RawDiarization, DiarizationError>;
}
