//! Pipeline tunables

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Window length for diarization dispatch, in ms
    pub window_ms: u64,
    /// Maximum in-flight requests per batch
    pub concurrency: usize,
    /// Deadline for each dispatch batch
    pub batch_deadline: Duration,
    /// Cosine similarity above which two speakers are considered the same
    pub similarity_threshold: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_ms: callscribe_core::DEFAULT_WINDOW_MS,
            concurrency: 30,
            batch_deadline: Duration::from_secs(600),
            similarity_threshold: callscribe_diarization::SIMILARITY_THRESHOLD,
        }
    }
}
