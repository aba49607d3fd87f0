//! Per-request temporary audio files
//!
//! The transcription service reads audio from a path. Uploaded bytes are
//! written to a named temp file that is removed when the artifact drops.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::PipelineError;

const DEFAULT_EXTENSION: &str = "wav";

/// Uploaded audio stored on disk for the lifetime of one request
#[derive(Debug)]
pub struct AudioArtifact {
    file: NamedTempFile,
}

impl AudioArtifact {
    /// Write `bytes` to a fresh temp file
    ///
    /// The file keeps the extension of `filename` so the transcription
    /// service can sniff the container format.
    pub fn write(bytes: &[u8], filename: Option<&str>) -> Result<Self, PipelineError> {
        let suffix = format!(".{}", extension_of(filename));
        let mut file = tempfile::Builder::new()
            .prefix("isl-gloss-audio-")
            .suffix(&suffix)
            .tempfile()
            .map_err(|e| PipelineError::Audio(format!("failed to create temp file: {}", e)))?;

        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|e| PipelineError::Audio(format!("failed to write temp file: {}", e)))?;

        tracing::debug!(path = %file.path().display(), bytes = bytes.len(), "Stored audio upload");

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Lowercase alphanumeric extension from an upload filename
fn extension_of(filename: Option<&str>) -> String {
    filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
