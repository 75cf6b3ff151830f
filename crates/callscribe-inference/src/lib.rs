//! Remote inference engine client for callscribe
//!
//! Implements the diarization and transcription capabilities against an
//! HTTP inference engine: audio goes out as a WAV part in a multipart
//! form, results come back as JSON.

pub mod client;
pub mod error;

pub use client::InferenceClient;
pub use error::InferenceError;
