//! callscribe-core - shared types for the callscribe transcription engine
//!
//! Provides the decoded audio buffer, fixed-length windowing and the data
//! types exchanged between the diarization and transcription stages.

pub mod audio;
pub mod chunker;
pub mod types;

pub use audio::{AudioBuffer, AudioError};
pub use chunker::{windows, Window, DEFAULT_WINDOW_MS};
pub use types::*;
