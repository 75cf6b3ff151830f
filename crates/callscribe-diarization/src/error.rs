//! Diarization error types

use thiserror::Error;

/// Diarization-related errors
#[derive(Error, Debug)]
pub enum DiarizationError {
    /// Engine request failed (non-success status or transport failure)
    #[error("Diarization request failed: {0}")]
    RequestFailed(String),

    /// Engine returned a response that could not be decoded
    #[error("Invalid diarization response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {0} seconds")]
    RateLimited(u64),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Request timed out
    #[error("Diarization request timed out")]
    Timeout,

    /// Audio could not be prepared for transport
    #[error("Audio error: {0}")]
    Audio(#[from] callscribe_core::AudioError),
}
