//! ISL Gloss Server
//!
//! HTTP endpoints for text and audio translation to ISL gloss.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use crate::metrics::init_metrics;
pub use state::AppState;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Annotation service unavailable: {0}")]
    AnnotationUnavailable(String),

    #[error("Transcription service unavailable: {0}")]
    TranscriptionUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Machine-readable error code for the response body
    pub fn code(&self) -> &'static str {
        match self {
            ServerError::InvalidRequest(_) => "INVALID_REQUEST",
            ServerError::AnnotationUnavailable(_) => "ANNOTATION_UNAVAILABLE",
            ServerError::TranscriptionUnavailable(_) => "TRANSCRIPTION_UNAVAILABLE",
            ServerError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::AnnotationUnavailable(_)
            | ServerError::TranscriptionUnavailable(_)
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServerError> for StatusCode {
    fn from(err: ServerError) -> Self {
        err.status()
    }
}

impl From<isl_gloss_core::Error> for ServerError {
    fn from(err: isl_gloss_core::Error) -> Self {
        use isl_gloss_core::Error;

        match err {
            Error::InvalidRequest(msg) => ServerError::InvalidRequest(msg),
            Error::AnnotationServiceUnavailable(msg) => ServerError::AnnotationUnavailable(msg),
            Error::TranscriptionServiceUnavailable(msg) => ServerError::TranscriptionUnavailable(msg),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        } else {
            tracing::debug!(code = self.code(), error = %self, "Request rejected");
        }

        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
        }));
        (status, body).into_response()
    }
}
