//! Per-segment transcription state machine
//!
//! Each diarized segment runs through Attempt -> Evaluate -> {Accept,
//! RetryNoPrompt, GiveUp}: decode with the shared prompt, gate the result
//! on the engine's quality signals, retry once without the prompt when
//! the gate trips, then fill internal silence gaps and assemble the text.

use tracing::{debug, warn};

use callscribe_core::{AudioBuffer, SegmentResult};

use crate::capability::{QualityChunk, TranscriptionCapability, TranscriptionTask};
use crate::error::TranscriptionError;

/// Quality-gate thresholds
#[derive(Debug, Clone)]
pub struct QualityPolicy {
    /// Chunks with a mean log-probability below this are bad
    pub min_avg_logprob: f64,
    /// Chunks with a compression ratio above this are bad
    pub max_compression_ratio: f64,
    /// Fraction of bad chunks at which a result is rejected (inclusive)
    pub max_error_rate: f64,
    /// Inter-chunk silence beyond this many seconds is re-queried
    pub max_gap_s: f64,
}

impl Default for QualityPolicy {
    fn default() -> Self {
        Self {
            min_avg_logprob: -1.0,
            max_compression_ratio: 2.4,
            max_error_rate: 0.25,
            max_gap_s: 5.0,
        }
    }
}

impl QualityPolicy {
    /// Whether a chunk fails the quality gate
    pub fn is_bad(&self, chunk: &QualityChunk) -> bool {
        chunk.avg_logprob < self.min_avg_logprob
            || chunk.compression_ratio > self.max_compression_ratio
    }
}

/// Verdict on one decode attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    /// Result is usable, proceed to gap fill and assembly
    Accept,
    /// Quality gate tripped while a prompt was set: drop it and go again
    RetryWithoutPrompt,
    /// Nothing decodable, the segment is dropped
    GiveUp,
}

/// Runs one transcription task against the external engine.
///
/// Any error anywhere in the sequence drops the task (logged, never
/// fatal to the orchestrator); the segment is simply absent from the
/// final transcript.
#[derive(Debug, Clone, Default)]
pub struct SegmentTranscriber {
    policy: QualityPolicy,
}

impl SegmentTranscriber {
    /// Create a transcriber with the given quality policy
    pub fn new(policy: QualityPolicy) -> Self {
        Self { policy }
    }

    /// Transcribe one segment, returning `None` when it is dropped
    pub async fn run<C>(&self, capability: &C, task: TranscriptionTask) -> Option<SegmentResult>
    where
        C: TranscriptionCapability + Sync,
    {
        match self.transcribe(capability, &task).await {
            Ok(result) => result,
            Err(err) => {
                warn!("dropping segment at {}ms: {}", task.start_ms, err);
                None
            }
        }
    }

    async fn transcribe<C>(
        &self,
        capability: &C,
        task: &TranscriptionTask,
    ) -> Result<Option<SegmentResult>, TranscriptionError>
    where
        C: TranscriptionCapability + Sync,
    {
        // Temperature 0: deterministic decoding
        let mut prompt = task.prompt.as_str();
        let mut chunks = capability.transcribe(task.audio.clone(), prompt, 0.0).await?;

        loop {
            match self.evaluate(&chunks, !prompt.is_empty()) {
                Decision::Accept => break,
                Decision::RetryWithoutPrompt => {
                    // The prompt can bias a poor decode; one retry without
                    // it. With the prompt already empty the gate never
                    // asks again, so the loop terminates.
                    debug!(
                        "segment at {}ms failed the quality gate, retrying without prompt",
                        task.start_ms
                    );
                    prompt = "";
                    chunks = capability.transcribe(task.audio.clone(), prompt, 0.0).await?;
                }
                Decision::GiveUp => {
                    debug!("segment at {}ms decoded to nothing", task.start_ms);
                    return Ok(None);
                }
            }
        }

        self.fill_gaps(capability, &task.audio, &mut chunks).await?;

        let text = self.assemble(&chunks);
        if text.is_empty() {
            return Ok(None);
        }

        Ok(Some(SegmentResult {
            speaker: task.speaker.clone(),
            text,
            start_ms: task.start_ms,
        }))
    }

    /// Gate one decode attempt on the engine's quality signals
    fn evaluate(&self, chunks: &[QualityChunk], prompted: bool) -> Decision {
        if chunks.is_empty() {
            return if prompted {
                Decision::RetryWithoutPrompt
            } else {
                Decision::GiveUp
            };
        }

        let bad = chunks.iter().filter(|c| self.policy.is_bad(c)).count();
        let error_rate = bad as f64 / chunks.len() as f64;

        if error_rate >= self.policy.max_error_rate && prompted {
            Decision::RetryWithoutPrompt
        } else {
            // Past the promptless retry the last output is kept as-is;
            // assembly still skips the bad chunks.
            Decision::Accept
        }
    }

    /// Re-query internal silence gaps longer than the policy allows.
    ///
    /// Dropouts inside a segment leave holes between consecutive chunks;
    /// each hole is transcribed once, promptless, and the resulting
    /// chunks are spliced into the sequence at their absolute position.
    async fn fill_gaps<C>(
        &self,
        capability: &C,
        audio: &AudioBuffer,
        chunks: &mut Vec<QualityChunk>,
    ) -> Result<(), TranscriptionError>
    where
        C: TranscriptionCapability + Sync,
    {
        chunks.sort_by(|a, b| a.start_s.total_cmp(&b.start_s));

        let gaps: Vec<(f64, f64)> = chunks
            .windows(2)
            .filter(|pair| pair[1].start_s - pair[0].end_s > self.policy.max_gap_s)
            .map(|pair| (pair[0].end_s, pair[1].start_s))
            .collect();

        for (gap_start, gap_end) in gaps {
            debug!("re-querying {:.1}s-{:.1}s silence gap", gap_start, gap_end);
            let slice = audio.slice_ms((gap_start * 1_000.0) as u64, (gap_end * 1_000.0) as u64);
            let filler = capability.transcribe(slice, "", 0.0).await?;

            chunks.extend(filler.into_iter().map(|mut chunk| {
                // Gap chunks come back relative to the gap slice
                chunk.start_s += gap_start;
                chunk.end_s += gap_start;
                chunk
            }));
        }

        chunks.sort_by(|a, b| a.start_s.total_cmp(&b.start_s));
        Ok(())
    }

    /// Concatenate the text of all chunks that pass the quality gate
    fn assemble(&self, chunks: &[QualityChunk]) -> String {
        chunks
            .iter()
            .filter(|c| !self.policy.is_bad(c))
            .map(|c| c.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
