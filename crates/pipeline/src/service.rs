//! Service handles
//!
//! Each external collaborator is initialized once at startup. If that fails,
//! the failure reason is cached and returned on every call; initialization is
//! never re-attempted.

use std::sync::Arc;

use isl_gloss_config::{AnnotationConfig, TranscriptionConfig};
use isl_gloss_core::{SpeechToText, TokenAnnotator};

use crate::{HttpAnnotator, HttpTranscriber};

/// A collaborator that is either ready to serve or permanently unavailable
pub enum ServiceHandle<S: ?Sized> {
    Ready(Arc<S>),
    Unavailable { reason: String },
}

impl<S: ?Sized> ServiceHandle<S> {
    pub fn ready(service: Arc<S>) -> Self {
        ServiceHandle::Ready(service)
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        ServiceHandle::Unavailable {
            reason: reason.into(),
        }
    }

    /// The service, or the cached initialization failure
    pub fn get(&self) -> Result<&Arc<S>, &str> {
        match self {
            ServiceHandle::Ready(service) => Ok(service),
            ServiceHandle::Unavailable { reason } => Err(reason),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ServiceHandle::Ready(_))
    }

    /// Cached failure reason, if unavailable
    pub fn reason(&self) -> Option<&str> {
        match self {
            ServiceHandle::Ready(_) => None,
            ServiceHandle::Unavailable { reason } => Some(reason),
        }
    }
}

impl<S: ?Sized> Clone for ServiceHandle<S> {
    fn clone(&self) -> Self {
        match self {
            ServiceHandle::Ready(service) => ServiceHandle::Ready(Arc::clone(service)),
            ServiceHandle::Unavailable { reason } => ServiceHandle::Unavailable {
                reason: reason.clone(),
            },
        }
    }
}

impl<S: ?Sized> std::fmt::Debug for ServiceHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceHandle::Ready(_) => f.write_str("Ready"),
            ServiceHandle::Unavailable { reason } => {
                f.debug_struct("Unavailable").field("reason", reason).finish()
            }
        }
    }
}

/// Build the annotation client and optionally probe it
pub async fn connect_annotator(config: &AnnotationConfig) -> ServiceHandle<dyn TokenAnnotator> {
    if config.endpoint.is_empty() {
        tracing::warn!("Annotation endpoint not configured; text translation disabled");
        return ServiceHandle::unavailable("annotation endpoint not configured");
    }

    let annotator = match HttpAnnotator::new(config) {
        Ok(annotator) => annotator,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create annotation client");
            return ServiceHandle::unavailable(e.to_string());
        }
    };

    if config.probe_on_startup {
        if let Err(e) = annotator.probe().await {
            tracing::warn!(
                endpoint = %annotator.endpoint(),
                error = %e,
                "Annotation sidecar unavailable"
            );
            return ServiceHandle::unavailable(e.to_string());
        }
    }

    tracing::info!(
        endpoint = %annotator.endpoint(),
        model = %config.model,
        "Annotation client ready"
    );
    let annotator: Arc<dyn TokenAnnotator> = Arc::new(annotator);
    ServiceHandle::ready(annotator)
}

/// Build the transcription client and optionally probe it
pub async fn connect_transcriber(config: &TranscriptionConfig) -> ServiceHandle<dyn SpeechToText> {
    if config.endpoint.is_empty() {
        tracing::warn!("Transcription endpoint not configured; audio translation disabled");
        return ServiceHandle::unavailable("transcription endpoint not configured");
    }

    let transcriber = match HttpTranscriber::new(config) {
        Ok(transcriber) => transcriber,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create transcription client");
            return ServiceHandle::unavailable(e.to_string());
        }
    };

    if config.probe_on_startup {
        if let Err(e) = transcriber.probe().await {
            tracing::warn!(
                endpoint = %transcriber.endpoint(),
                error = %e,
                "Transcription service unavailable"
            );
            return ServiceHandle::unavailable(e.to_string());
        }
    }

    tracing::info!(
        endpoint = %transcriber.endpoint(),
        model = %config.model,
        "Transcription client ready"
    );
    let transcriber: Arc<dyn SpeechToText> = Arc::new(transcriber);
    ServiceHandle::ready(transcriber)
}
