//! Publisher interface
//!
//! The pipeline itself persists nothing; the surrounding service hands
//! the finished transcript to a publisher together with the summary and
//! action items it derived from it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use callscribe_core::Transcript;

/// Publishing errors
#[derive(Error, Debug)]
pub enum PublishError {
    /// The downstream record service rejected the request
    #[error("Publish request failed: {0}")]
    RequestFailed(String),

    /// The record could not be assembled
    #[error("Invalid publish record: {0}")]
    InvalidRecord(String),
}

/// A finished transcript plus its derived artifacts, attributed to the
/// parties and recording attachment it belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    /// The speaker-attributed transcript
    pub transcript: Transcript,
    /// Summary of the conversation
    pub summary: String,
    /// Extracted action items
    pub action_items: Vec<String>,
    /// Identifiers of the participating parties
    pub party_ids: Vec<String>,
    /// Identifier of the stored recording, if any
    pub attachment_id: Option<String>,
}

/// Downstream record service
#[trait_variant::make(TranscriptPublisher: Send)]
pub trait LocalTranscriptPublisher {
    /// Publish a finished transcript record
    async fn publish(&self, request: PublishRequest) -> Result<(), PublishError>;
}
