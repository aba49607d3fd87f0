//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use isl_gloss_config::Settings;
use isl_gloss_pipeline::GlossTranslator;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<Settings>,
    /// Translator with its annotation and transcription handles
    pub translator: Arc<GlossTranslator>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Settings, translator: GlossTranslator) -> Self {
        Self {
            config: Arc::new(config),
            translator: Arc::new(translator),
        }
    }
}
