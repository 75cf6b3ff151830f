//! Shared data types

use serde::{Deserialize, Serialize};

/// A diarized segment in absolute recording time with a stable,
/// recording-wide speaker label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSegment {
    /// Start time in ms from the beginning of the recording
    pub start_ms: u64,
    /// Stop time in ms from the beginning of the recording
    pub stop_ms: u64,
    /// Stable speaker label
    pub speaker: String,
}

impl GlobalSegment {
    /// Duration of this segment in ms
    pub fn duration_ms(&self) -> u64 {
        self.stop_ms.saturating_sub(self.start_ms)
    }
}

/// Transcribed text for one diarized segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentResult {
    /// Stable speaker label
    pub speaker: String,
    /// Transcribed text
    pub text: String,
    /// Start time in ms from the beginning of the recording
    pub start_ms: u64,
}

/// The final speaker-attributed transcript, ordered by start time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Segment results, ascending by `start_ms`
    pub segments: Vec<SegmentResult>,
}

impl Transcript {
    /// Build a transcript from results in arbitrary completion order
    pub fn from_unordered(mut segments: Vec<SegmentResult>) -> Self {
        segments.sort_by_key(|s| s.start_ms);
        Self { segments }
    }

    /// Number of transcribed segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// An empty transcript is a valid-but-unproductive outcome, not an error
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render as speaker-attributed plain text, one segment per line
    pub fn to_plain_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("{}: {}", s.speaker, s.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Contextual metadata about the call, used to build the shared
/// transcription prompt
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticipantContext {
    /// Participant names
    pub names: Vec<String>,
    /// Industries the participants work in
    pub industries: Vec<String>,
    /// Free-text descriptions of the participants
    pub descriptions: Vec<String>,
    /// Topic of the call
    pub topic: Option<String>,
}
