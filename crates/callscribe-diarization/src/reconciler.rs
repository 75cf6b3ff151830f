//! Cross-window speaker reconciliation
//!
//! Merges per-window diarization results into one global, offset-corrected
//! segment timeline with stable speaker labels.

use std::collections::HashMap;

use tracing::{debug, info};

use callscribe_core::GlobalSegment;

use crate::capability::WindowDiarization;
use crate::registry::SpeakerRegistry;

/// Similarity above which a window-local speaker is considered the same
/// person as an already-registered one
pub const SIMILARITY_THRESHOLD: f32 = 0.5;

/// The unified timeline plus the registry that labels it
#[derive(Debug)]
pub struct ReconciledDiarization {
    /// Global segments, ascending by start time
    pub segments: Vec<GlobalSegment>,
    /// Stable label to embedding mapping populated during reconciliation
    pub registry: SpeakerRegistry,
}

/// Merge (possibly partial) window results into one global timeline.
///
/// Windows are processed in offset order. The first window's local labels
/// seed the registry verbatim; later windows are matched against it by
/// embedding similarity, minting a new label when nothing scores above
/// `threshold`. Segment times are shifted by the window offset, and a
/// window's first segment is folded into the previous segment when the
/// speaker matches and the two touch in time, since a window boundary can
/// split a single utterance.
///
/// An empty input yields an empty timeline and an empty registry.
pub fn reconcile(mut windows: Vec<WindowDiarization>, threshold: f32) -> ReconciledDiarization {
    windows.sort_by_key(|w| w.offset_ms);

    let mut registry = SpeakerRegistry::new();
    let mut segments: Vec<GlobalSegment> = Vec::new();

    for (index, window) in windows.into_iter().enumerate() {
        let mapping = if index == 0 {
            let mut mapping = HashMap::new();
            for (label, embedding) in &window.raw.embeddings {
                registry.seed(label, embedding.clone());
                mapping.insert(label.clone(), label.clone());
            }
            mapping
        } else {
            // Sorted labels keep minting order deterministic
            let mut locals: Vec<_> = window.raw.embeddings.iter().collect();
            locals.sort_by(|a, b| a.0.cmp(b.0));

            locals
                .into_iter()
                .map(|(label, embedding)| {
                    let global = registry.resolve(embedding, threshold);
                    debug!(
                        "window at {}ms: local speaker {} -> {}",
                        window.offset_ms, label, global
                    );
                    (label.clone(), global)
                })
                .collect()
        };

        for (position, segment) in window.raw.segments.iter().enumerate() {
            let speaker = match mapping.get(&segment.speaker) {
                Some(global) => global.clone(),
                None => {
                    // A label the engine gave no embedding for cannot be
                    // matched; register it as-is so every label in the
                    // final transcript stays resolvable in the registry.
                    debug!(
                        "window at {}ms: no embedding for local speaker {}",
                        window.offset_ms, segment.speaker
                    );
                    registry.seed(&segment.speaker, Vec::new());
                    segment.speaker.clone()
                }
            };

            let start_ms = segment.start_ms + window.offset_ms;
            let stop_ms = segment.stop_ms + window.offset_ms;

            // Boundary smoothing: a window's first segment continues the
            // previous one when speaker and timing line up.
            if position == 0 {
                if let Some(last) = segments.last_mut() {
                    if last.speaker == speaker && start_ms <= last.stop_ms {
                        last.stop_ms = last.stop_ms.max(stop_ms);
                        continue;
                    }
                }
            }

            segments.push(GlobalSegment {
                start_ms,
                stop_ms,
                speaker,
            });
        }
    }

    info!(
        "reconciled {} segments across {} speakers",
        segments.len(),
        registry.len()
    );

    ReconciledDiarization { segments, registry }
}
