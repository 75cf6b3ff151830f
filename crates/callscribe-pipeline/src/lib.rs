//! End-to-end transcript pipeline for callscribe
//!
//! Wires the windowing, diarization and transcription stages into one
//! `produce_transcript` operation, and defines the publisher interface
//! the surrounding service hands finished transcripts to.

pub mod config;
pub mod pipeline;
pub mod publisher;

pub use config::PipelineConfig;
pub use pipeline::TranscriptPipeline;
pub use publisher::{PublishError, PublishRequest, TranscriptPublisher};
