//! Per-segment transcription dispatch

use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::{timeout_at, Instant};
use tracing::{info, warn};

use callscribe_core::{AudioBuffer, GlobalSegment, ParticipantContext, Transcript};

use crate::capability::{TranscriptionCapability, TranscriptionTask};
use crate::prompt::build_context_prompt;
use crate::transcriber::SegmentTranscriber;

/// Default maximum number of in-flight transcription requests
pub const DEFAULT_CONCURRENCY: usize = 30;

/// Default batch deadline (10 minutes)
pub const DEFAULT_BATCH_DEADLINE: Duration = Duration::from_secs(600);

/// Dispatches one transcription task per diarized segment under bounded
/// concurrency with a batch deadline, then restores time order.
///
/// Dropped segments are filtered out; zero surviving segments yield an
/// empty transcript, never an error.
#[derive(Debug, Clone)]
pub struct TranscriptionOrchestrator {
    concurrency: usize,
    batch_deadline: Duration,
    transcriber: SegmentTranscriber,
}

impl Default for TranscriptionOrchestrator {
    fn default() -> Self {
        Self::new(
            DEFAULT_CONCURRENCY,
            DEFAULT_BATCH_DEADLINE,
            SegmentTranscriber::default(),
        )
    }
}

impl TranscriptionOrchestrator {
    /// Create an orchestrator with the given limits and segment transcriber
    pub fn new(
        concurrency: usize,
        batch_deadline: Duration,
        transcriber: SegmentTranscriber,
    ) -> Self {
        Self {
            concurrency,
            batch_deadline,
            transcriber,
        }
    }

    /// Transcribe every segment of the recording.
    ///
    /// One shared prompt is built from the participant context; each task
    /// owns its own slice of the recording.
    pub async fn run<C>(
        &self,
        capability: &C,
        audio: &AudioBuffer,
        segments: &[GlobalSegment],
        context: &ParticipantContext,
    ) -> Transcript
    where
        C: TranscriptionCapability + Sync,
    {
        if segments.is_empty() {
            return Transcript::default();
        }

        let prompt = build_context_prompt(context);
        let total = segments.len();
        info!(
            "transcribing {} segments (concurrency {}, deadline {:?})",
            total, self.concurrency, self.batch_deadline
        );

        let tasks: Vec<TranscriptionTask> = segments
            .iter()
            .map(|segment| TranscriptionTask {
                speaker: segment.speaker.clone(),
                audio: audio.slice_ms(segment.start_ms, segment.stop_ms),
                start_ms: segment.start_ms,
                stop_ms: segment.stop_ms,
                prompt: prompt.clone(),
            })
            .collect();

        let transcriber = &self.transcriber;
        let deadline = Instant::now() + self.batch_deadline;
        let mut in_flight = stream::iter(tasks)
            .map(|task| async move { transcriber.run(capability, task).await })
            .buffer_unordered(self.concurrency);

        let mut results = Vec::new();
        loop {
            match timeout_at(deadline, in_flight.next()).await {
                Ok(Some(Some(result))) => results.push(result),
                // Dropped segments were already logged by the transcriber
                Ok(Some(None)) => {}
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        "transcription deadline elapsed, keeping {} of {} segments",
                        results.len(),
                        total
                    );
                    break;
                }
            }
        }

        info!("transcription batch complete: {}/{} segments", results.len(), total);
        Transcript::from_unordered(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::QualityChunk;
    use crate::error::TranscriptionError;

    /// Transcribes every slice to a fixed text keyed off its duration,
    /// failing slices whose duration matches the rejected length and
    /// stalling slices whose duration matches the stalled one.
    struct EchoEngine {
        reject_duration_ms: Option<u64>,
        stall_duration_ms: Option<u64>,
    }

    impl TranscriptionCapability for EchoEngine {
        async fn transcribe(
            &self,
            audio: AudioBuffer,
            _prompt: &str,
            _temperature: f32,
        ) -> Result<Vec<QualityChunk>, TranscriptionError> {
            if self.stall_duration_ms == Some(audio.duration_ms()) {
                tokio::time::sleep(std::time::Duration::from_secs(3_600)).await;
            }
            if self.reject_duration_ms == Some(audio.duration_ms()) {
                return Err(TranscriptionError::RequestFailed("rejected".to_string()));
            }
            let end_s = audio.duration_ms() as f64 / 1_000.0;
            Ok(vec![QualityChunk {
                text: format!("{}ms", audio.duration_ms()),
                start_s: 0.0,
                end_s,
                avg_logprob: -0.1,
                compression_ratio: 1.0,
            }])
        }
    }

    fn segment(start_ms: u64, stop_ms: u64, speaker: &str) -> GlobalSegment {
        GlobalSegment {
            start_ms,
            stop_ms,
            speaker: speaker.to_string(),
        }
    }

    fn recording(duration_ms: u64) -> AudioBuffer {
        AudioBuffer::from_samples(vec![0.0; (duration_ms * 16) as usize], 16_000)
    }

    #[tokio::test]
    async fn test_results_are_ordered_by_start_time() {
        let engine = EchoEngine {
            reject_duration_ms: None,
            stall_duration_ms: None,
        };
        let audio = recording(60_000);
        let segments = vec![
            segment(30_000, 40_000, "B"),
            segment(0, 10_000, "A"),
            segment(50_000, 55_000, "A"),
        ];

        let transcript = TranscriptionOrchestrator::default()
            .run(&engine, &audio, &segments, &ParticipantContext::default())
            .await;

        let starts: Vec<u64> = transcript.segments.iter().map(|s| s.start_ms).collect();
        assert_eq!(starts, vec![0, 30_000, 50_000]);
        assert_eq!(transcript.segments[0].speaker, "A");
        assert_eq!(transcript.segments[0].text, "10000ms");
    }

    #[tokio::test]
    async fn test_failed_segments_are_filtered_out() {
        let engine = EchoEngine {
            reject_duration_ms: Some(20_000),
            stall_duration_ms: None,
        };
        let audio = recording(60_000);
        let segments = vec![
            segment(0, 10_000, "A"),
            segment(10_000, 30_000, "B"),
            segment(30_000, 35_000, "A"),
        ];

        let transcript = TranscriptionOrchestrator::default()
            .run(&engine, &audio, &segments, &ParticipantContext::default())
            .await;

        assert_eq!(transcript.len(), 2);
        assert!(transcript.segments.iter().all(|s| s.speaker == "A"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_abandons_outstanding_segments() {
        // The 20s segment stalls past the deadline and is abandoned;
        // the completed segments still form a transcript
        let engine = EchoEngine {
            reject_duration_ms: None,
            stall_duration_ms: Some(20_000),
        };
        let audio = recording(60_000);
        let segments = vec![
            segment(0, 10_000, "A"),
            segment(10_000, 30_000, "B"),
            segment(30_000, 35_000, "A"),
        ];

        let orchestrator = TranscriptionOrchestrator::new(
            30,
            Duration::from_secs(10),
            SegmentTranscriber::default(),
        );
        let transcript = orchestrator
            .run(&engine, &audio, &segments, &ParticipantContext::default())
            .await;

        let starts: Vec<u64> = transcript.segments.iter().map(|s| s.start_ms).collect();
        assert_eq!(starts, vec![0, 30_000]);
    }

    #[tokio::test]
    async fn test_zero_segments_yield_empty_transcript() {
        let engine = EchoEngine {
            reject_duration_ms: None,
            stall_duration_ms: None,
        };
        let transcript = TranscriptionOrchestrator::default()
            .run(&engine, &recording(1_000), &[], &ParticipantContext::default())
            .await;
        assert!(transcript.is_empty());
    }
}
