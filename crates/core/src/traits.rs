//! Collaborator traits
//!
//! The linguistic parser and the speech-to-text engine are external services.
//! Both sit behind these traits so they can be swapped, mocked in tests, or
//! replaced by an "unavailable" handle when they fail to initialize.
//!
//! ```text
//!   SpeechToText:   audio file -> text
//!   TokenAnnotator: text       -> annotated tokens
//! ```

use async_trait::async_trait;
use std::path::Path;

use crate::{AnnotatedToken, Result};

/// Text annotation (POS tags, lemmas, dependency relations)
#[async_trait]
pub trait TokenAnnotator: Send + Sync {
    /// Annotate text, returning tokens in left-to-right surface order
    async fn annotate(&self, text: &str) -> Result<Vec<AnnotatedToken>>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Audio transcription
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe the audio stored at `audio_path`
    async fn transcribe(&self, audio_path: &Path) -> Result<String>;

    /// Backend name for logging
    fn name(&self) -> &str;
}
