//! Speaker diarization orchestration for callscribe
//!
//! Dispatches recording windows to an external diarization engine under
//! bounded concurrency and reconciles the per-window results into one
//! global segment timeline with stable speaker labels.

pub mod capability;
pub mod error;
pub mod orchestrator;
pub mod reconciler;
pub mod registry;

pub use capability::{DiarizationCapability, DiarizedSegment, RawDiarization, WindowDiarization};
pub use error::DiarizationError;
pub use orchestrator::DiarizationOrchestrator;
pub use reconciler::{reconcile, ReconciledDiarization, SIMILARITY_THRESHOLD};
pub use registry::{cosine_similarity, AlphabeticLabels, LabelStrategy, SpeakerRegistry};
