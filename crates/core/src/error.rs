//! Error types for the ISL gloss service

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the ISL gloss service
#[derive(Error, Debug)]
pub enum Error {
    /// The linguistic parser failed to initialize or failed during a call
    #[error("Annotation service unavailable: {0}")]
    AnnotationServiceUnavailable(String),

    /// The speech-to-text engine failed to initialize or failed during a call
    #[error("Transcription service unavailable: {0}")]
    TranscriptionServiceUnavailable(String),

    /// A required field was missing or malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an annotation-unavailable error
    pub fn annotation_unavailable<S: Into<String>>(msg: S) -> Self {
        Error::AnnotationServiceUnavailable(msg.into())
    }

    /// Create a transcription-unavailable error
    pub fn transcription_unavailable<S: Into<String>>(msg: S) -> Self {
        Error::TranscriptionServiceUnavailable(msg.into())
    }

    /// Create an invalid-request error
    pub fn invalid_request<S: Into<String>>(msg: S) -> Self {
        Error::InvalidRequest(msg.into())
    }

    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Whether this error was caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidRequest(_))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
