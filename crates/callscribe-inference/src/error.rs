//! Inference client error types

use thiserror::Error;

use callscribe_diarization::DiarizationError;
use callscribe_transcription::TranscriptionError;

/// Errors talking to the remote inference engine
#[derive(Error, Debug)]
pub enum InferenceError {
    /// Request failed (non-success status or transport failure)
    #[error("Inference request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be decoded
    #[error("Invalid inference response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {0} seconds")]
    RateLimited(u64),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Audio could not be encoded for transport
    #[error("Audio error: {0}")]
    Audio(#[from] callscribe_core::AudioError),
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            InferenceError::Timeout
        } else if err.is_connect() {
            InferenceError::ConnectionError(err.to_string())
        } else {
            InferenceError::RequestFailed(err.to_string())
        }
    }
}

impl From<InferenceError> for DiarizationError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::RequestFailed(msg) => DiarizationError::RequestFailed(msg),
            InferenceError::InvalidResponse(msg) => DiarizationError::InvalidResponse(msg),
            InferenceError::RateLimited(secs) => DiarizationError::RateLimited(secs),
            InferenceError::ConnectionError(msg) => DiarizationError::ConnectionError(msg),
            InferenceError::Timeout => DiarizationError::Timeout,
            InferenceError::Audio(err) => DiarizationError::Audio(err),
        }
    }
}

impl From<InferenceError> for TranscriptionError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::RequestFailed(msg) => TranscriptionError::RequestFailed(msg),
            InferenceError::InvalidResponse(msg) => TranscriptionError::InvalidResponse(msg),
            InferenceError::RateLimited(secs) => TranscriptionError::RateLimited(secs),
            InferenceError::ConnectionError(msg) => TranscriptionError::ConnectionError(msg),
            InferenceError::Timeout => TranscriptionError::Timeout,
            InferenceError::Audio(err) => TranscriptionError::Audio(err),
        }
    }
}
