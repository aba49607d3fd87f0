//! Configuration management for the ISL gloss service
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, `config/{env}`)
//! - Environment variables (ISL_GLOSS_ prefix, `__` separator)

pub mod settings;

pub use settings::{
    load_settings, AnnotationConfig, GlossConfig, ObservabilityConfig, ServerConfig, Settings,
    TranscriptionConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for isl_gloss_core::Error {
    fn from(err: ConfigError) -> Self {
        isl_gloss_core::Error::config(err.to_string())
    }
}
