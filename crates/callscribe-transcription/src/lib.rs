//! Per-segment transcription orchestration for callscribe
//!
//! Turns a reconciled diarization timeline into a speaker-attributed
//! transcript by dispatching one transcription task per segment to an
//! external engine, gating results on decode quality, retrying once with
//! a reduced prompt and filling internal silence gaps.

pub mod capability;
pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod transcriber;

pub use capability::{QualityChunk, TranscriptionCapability, TranscriptionTask};
pub use error::TranscriptionError;
pub use orchestrator::TranscriptionOrchestrator;
pub use prompt::build_context_prompt;
pub use transcriber::{QualityPolicy, SegmentTranscriber};
