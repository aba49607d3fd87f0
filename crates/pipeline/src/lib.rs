//! Request pipeline for the ISL gloss service
//!
//! This crate wires the external collaborators to the gloss mapper:
//! - HTTP client for the annotation sidecar (spaCy-style parser)
//! - HTTP client for a Whisper-compatible transcription service
//! - Service handles that cache an initialization failure
//! - Per-request temporary audio artifacts
//! - The orchestrator: audio → text → tokens → gloss

pub mod annotation;
pub mod audio;
pub mod orchestrator;
pub mod service;
pub mod transcription;

pub use annotation::HttpAnnotator;
pub use audio::AudioArtifact;
pub use orchestrator::{GlossTranslator, StageTimings, Translation, TranslationInput};
pub use service::{connect_annotator, connect_transcriber, ServiceHandle};
pub use transcription::HttpTranscriber;

use thiserror::Error;

/// Pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Annotation error: {0}")]
    Annotation(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Audio error: {0}")]
    Audio(String),
}

impl From<PipelineError> for isl_gloss_core::Error {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Annotation(msg) => isl_gloss_core::Error::AnnotationServiceUnavailable(msg),
            PipelineError::Transcription(msg) => {
                isl_gloss_core::Error::TranscriptionServiceUnavailable(msg)
            }
            PipelineError::Audio(msg) => isl_gloss_core::Error::Other(format!("Audio error: {}", msg)),
        }
    }
}
