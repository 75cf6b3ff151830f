//! The transcript pipeline

use tracing::info;

use callscribe_core::{windows, AudioBuffer, ParticipantContext, Transcript};
use callscribe_diarization::{reconcile, DiarizationCapability, DiarizationOrchestrator};
use callscribe_transcription::{
    SegmentTranscriber, TranscriptionCapability, TranscriptionOrchestrator,
};

use crate::config::PipelineConfig;

/// Produces a speaker-attributed transcript from a decoded recording.
///
/// Synchronous from the caller's point of view, internally parallel.
/// Partial failure at any stage degrades the output rather than failing
/// it: an empty transcript is a valid-but-unproductive outcome and the
/// only signal the caller gets for a recording where nothing survived.
pub struct TranscriptPipeline<D, T> {
    diarization: D,
    transcription: T,
    config: PipelineConfig,
}

impl<D, T> TranscriptPipeline<D, T>
where
    D: DiarizationCapability + Sync,
    T: TranscriptionCapability + Sync,
{
    /// Create a pipeline over the given capabilities with default tunables
    pub fn new(diarization: D, transcription: T) -> Self {
        Self::with_config(diarization, transcription, PipelineConfig::default())
    }

    /// Create a pipeline with custom tunables
    pub fn with_config(diarization: D, transcription: T, config: PipelineConfig) -> Self {
        Self {
            diarization,
            transcription,
            config,
        }
    }

    /// Current tunables
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Turn a recording into an ordered, speaker-attributed transcript
    pub async fn produce_transcript(
        &self,
        audio: AudioBuffer,
        context: &ParticipantContext,
    ) -> Transcript {
        info!("producing transcript for {}ms of audio", audio.duration_ms());

        let cut: Vec<_> = windows(&audio, self.config.window_ms).collect();

        let diarizer =
            DiarizationOrchestrator::new(self.config.concurrency, self.config.batch_deadline);
        let window_results = diarizer.run(&self.diarization, cut).await;

        let reconciled = reconcile(window_results, self.config.similarity_threshold);
        if reconciled.segments.is_empty() {
            info!("no diarized segments survived, transcript is empty");
            return Transcript::default();
        }

        let transcriber = TranscriptionOrchestrator::new(
            self.config.concurrency,
            self.config.batch_deadline,
            SegmentTranscriber::default(),
        );
        let transcript = transcriber
            .run(&self.transcription, &audio, &reconciled.segments, context)
            .await;

        info!(
            "transcript ready: {} segments, {} speakers",
            transcript.len(),
            reconciled.registry.len()
        );
        transcript
    }
}
