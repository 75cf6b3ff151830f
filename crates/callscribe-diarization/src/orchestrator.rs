//! Windowed diarization dispatch

use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use callscribe_core::Window;

use crate::capability::{DiarizationCapability, WindowDiarization};

/// Default maximum number of in-flight diarization requests
pub const DEFAULT_CONCURRENCY: usize = 30;

/// Default batch deadline (10 minutes)
pub const DEFAULT_BATCH_DEADLINE: Duration = Duration::from_secs(600);

/// Dispatches windows to the diarization engine under bounded concurrency
/// with a batch deadline.
///
/// Individual window failures are logged and dropped; windows still
/// outstanding at the deadline are abandoned. The batch never fails as a
/// whole: zero completed windows simply yields an empty result set.
#[derive(Debug, Clone)]
pub struct DiarizationOrchestrator {
    concurrency: usize,
    batch_deadline: Duration,
}

impl Default for DiarizationOrchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY, DEFAULT_BATCH_DEADLINE)
    }
}

impl DiarizationOrchestrator {
    /// Create an orchestrator with the given concurrency limit and batch
    /// deadline
    pub fn new(concurrency: usize, batch_deadline: Duration) -> Self {
        Self {
            concurrency,
            batch_deadline,
        }
    }

    /// Diarize all windows, returning results in completion order.
    ///
    /// Callers re-sort by offset before use.
    pub async fn run<C>(&self, capability: &C, windows: Vec<Window>) -> Vec<WindowDiarization>
    where
        C: DiarizationCapability + Sync,
    {
        let total = windows.len();
        if total == 0 {
            return Vec::new();
        }

        info!(
            "diarizing {} windows (concurrency {}, deadline {:?})",
            total, self.concurrency, self.batch_deadline
        );

        let deadline = Instant::now() + self.batch_deadline;
        let mut in_flight = stream::iter(windows)
            .map(|window| async move {
                let offset_ms = window.offset_ms;
                (offset_ms, capability.diarize(window.audio).await)
            })
            .buffer_unordered(self.concurrency);

        let mut results = Vec::new();
        loop {
            match timeout_at(deadline, in_flight.next()).await {
                Ok(Some((offset_ms, Ok(raw)))) => {
                    debug!(
                        "window at {}ms diarized: {} segments, {} speakers",
                        offset_ms,
                        raw.segments.len(),
                        raw.embeddings.len()
                    );
                    results.push(WindowDiarization { offset_ms, raw });
                }
                Ok(Some((offset_ms, Err(err)))) => {
                    // Dropping the window keeps a partial transcript
                    // available instead of failing the whole batch.
                    warn!("dropping window at {}ms: {}", offset_ms, err);
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        "diarization deadline elapsed, abandoning {} of {} windows",
                        total - results.len(),
                        total
                    );
                    break;
                }
            }
        }

        info!("diarization batch complete: {}/{} windows", results.len(), total);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{DiarizedSegment, RawDiarization};
    use crate::error::DiarizationError;
    use callscribe_core::AudioBuffer;

    /// Fails every window whose offset is in the failure list, sleeping
    /// first when a per-call delay is configured.
    struct ScriptedEngine {
        fail_below_ms: u64,
        delay_above_ms: Option<(u64, Duration)>,
    }

    impl DiarizationCapability for ScriptedEngine {
        async fn diarize(&self, audio: AudioBuffer) -> Result<RawDiarization, DiarizationError> {
            // Windows are 1s long in these tests; recover the offset from
            // the sample count encoded by the test fixture.
            let marker_ms = (audio.samples()[0] * 1_000_000.0).round() as u64;

            if let Some((threshold_ms, delay)) = self.delay_above_ms {
                if marker_ms >= threshold_ms {
                    tokio::time::sleep(delay).await;
                }
            }

            if marker_ms < self.fail_below_ms {
                return Err(DiarizationError::RequestFailed("engine says no".to_string()));
            }

            Ok(RawDiarization {
                segments: vec![DiarizedSegment {
                    start_ms: 0,
                    stop_ms: 1_000,
                    speaker: "A".to_string(),
                }],
                embeddings: [("A".to_string(), vec![1.0, 0.0])].into_iter().collect(),
            })
        }
    }

    fn marked_window(offset_ms: u64) -> Window {
        // First sample encodes the offset so the mock can key off it
        let mut samples = vec![0.0f32; 16_000];
        samples[0] = offset_ms as f32 / 1_000_000.0;
        Window {
            offset_ms,
            audio: AudioBuffer::from_samples(samples, 16_000),
        }
    }

    #[tokio::test]
    async fn test_failed_windows_are_dropped_not_fatal() {
        let engine = ScriptedEngine {
            fail_below_ms: 3_000,
            delay_above_ms: None,
        };
        let windows: Vec<Window> = (0..10).map(|i| marked_window(i * 1_000)).collect();

        let orchestrator = DiarizationOrchestrator::default();
        let results = orchestrator.run(&engine, windows).await;

        // 3 windows fail, 7 survive
        assert_eq!(results.len(), 7);
        assert!(results.iter().all(|r| r.offset_ms >= 3_000));
    }

    #[tokio::test]
    async fn test_zero_windows_yield_empty_batch() {
        let engine = ScriptedEngine {
            fail_below_ms: 0,
            delay_above_ms: None,
        };
        let orchestrator = DiarizationOrchestrator::default();
        let results = orchestrator.run(&engine, vec![]).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_all_windows_failing_yields_empty_batch() {
        let engine = ScriptedEngine {
            fail_below_ms: u64::MAX,
            delay_above_ms: None,
        };
        let windows: Vec<Window> = (0..4).map(|i| marked_window(i * 1_000)).collect();

        let orchestrator = DiarizationOrchestrator::default();
        let results = orchestrator.run(&engine, windows).await;
        assert!(results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_abandons_outstanding_windows() {
        // Windows at >= 2000ms stall past the deadline and are abandoned
        let engine = ScriptedEngine {
            fail_below_ms: 0,
            delay_above_ms: Some((2_000, Duration::from_secs(3_600))),
        };
        let windows: Vec<Window> = (0..5).map(|i| marked_window(i * 1_000)).collect();

        let orchestrator = DiarizationOrchestrator::new(30, Duration::from_secs(10));
        let results = orchestrator.run(&engine, windows).await;

        assert_eq!(results.len(), 2);
    }
}
