//! Transcription error types

use thiserror::Error;

/// Transcription-related errors
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// Engine request failed (non-success status or transport failure)
    #[error("Transcription request failed: {0}")]
    RequestFailed(String),

    /// Engine returned a response that could not be decoded
    #[error("Invalid transcription response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {0} seconds")]
    RateLimited(u64),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Request timed out
    #[error("Transcription request timed out")]
    Timeout,

    /// Audio could not be prepared for transport
    #[error("Audio error: {0}")]
    Audio(#[from] callscribe_core::AudioError),
}
