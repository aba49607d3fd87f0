//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use isl_gloss_core::GlossStrategy;

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Annotation sidecar configuration
    #[serde(default)]
    pub annotation: AnnotationConfig,

    /// Transcription service configuration
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Gloss mapping configuration
    #[serde(default)]
    pub gloss: GlossConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port must be non-zero".to_string(),
            });
        }

        if self.server.max_audio_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_audio_bytes".to_string(),
                message: "Audio upload limit must be non-zero".to_string(),
            });
        }

        validate_endpoint("annotation.endpoint", &self.annotation.endpoint)?;
        validate_endpoint("transcription.endpoint", &self.transcription.endpoint)?;

        let timeouts = [
            ("annotation.timeout_seconds", self.annotation.timeout_seconds),
            ("transcription.timeout_seconds", self.transcription.timeout_seconds),
        ];
        for (field, value) in timeouts {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "Timeout must be at least 1 second".to_string(),
                });
            }
        }

        if let Some(path) = &self.gloss.rules_path {
            if !(path.ends_with(".yaml") || path.ends_with(".yml") || path.ends_with(".toml")) {
                return Err(ConfigError::InvalidValue {
                    field: "gloss.rules_path".to_string(),
                    message: format!("expected a .yaml, .yml or .toml file, got '{}'", path),
                });
            }
        }

        Ok(())
    }
}

/// An empty endpoint means "not configured"; anything else must be an HTTP URL
fn validate_endpoint(field: &str, endpoint: &str) -> Result<(), ConfigError> {
    if endpoint.is_empty() || endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return Ok(());
    }

    Err(ConfigError::InvalidValue {
        field: field.to_string(),
        message: format!("expected an http(s) URL, got '{}'", endpoint),
    })
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body (audio uploads), in bytes
    #[serde(default = "default_max_audio_bytes")]
    pub max_audio_bytes: usize,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins (empty = any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_max_audio_bytes() -> usize {
    25 * 1024 * 1024
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_audio_bytes: default_max_audio_bytes(),
            cors_enabled: default_true(),
            cors_origins: Vec::new(),
        }
    }
}

/// Annotation sidecar configuration (spaCy-style parser served over HTTP)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationConfig {
    /// Base URL of the sidecar; empty disables annotation
    #[serde(default = "default_annotation_endpoint")]
    pub endpoint: String,

    /// Model the sidecar should load
    #[serde(default = "default_annotation_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Probe the sidecar's health endpoint once at startup
    #[serde(default = "default_true")]
    pub probe_on_startup: bool,
}

fn default_annotation_endpoint() -> String {
    "http://127.0.0.1:8001".to_string()
}
fn default_annotation_model() -> String {
    "en_core_web_sm".to_string()
}
fn default_timeout() -> u64 {
    30
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_annotation_endpoint(),
            model: default_annotation_model(),
            timeout_seconds: default_timeout(),
            probe_on_startup: true,
        }
    }
}

/// Transcription service configuration (Whisper-compatible HTTP API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Base URL of the transcription service; empty disables transcription
    #[serde(default = "default_transcription_endpoint")]
    pub endpoint: String,

    /// Model name sent with each request
    #[serde(default = "default_transcription_model")]
    pub model: String,

    /// Bearer token (set via ISL_GLOSS__TRANSCRIPTION__API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Language hint (ISO 639-1)
    #[serde(default = "default_language")]
    pub language: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_transcription_timeout")]
    pub timeout_seconds: u64,

    /// Probe the service's health endpoint once at startup
    #[serde(default)]
    pub probe_on_startup: bool,
}

fn default_transcription_endpoint() -> String {
    "http://127.0.0.1:8002".to_string()
}
fn default_transcription_model() -> String {
    "base".to_string()
}
fn default_language() -> Option<String> {
    Some("en".to_string())
}
fn default_transcription_timeout() -> u64 {
    120
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_transcription_endpoint(),
            model: default_transcription_model(),
            api_key: None,
            language: default_language(),
            timeout_seconds: default_transcription_timeout(),
            probe_on_startup: false,
        }
    }
}

/// Gloss mapping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlossConfig {
    /// Strategy used when a request does not pick one
    #[serde(default)]
    pub strategy: GlossStrategy,

    /// Gloss rules file (synonyms, accepted POS, negation markers)
    #[serde(default = "default_rules_path")]
    pub rules_path: Option<String>,

    /// Trim and lowercase input text before annotation
    #[serde(default = "default_true")]
    pub lowercase_input: bool,
}

fn default_rules_path() -> Option<String> {
    Some("config/gloss_rules.yaml".to_string())
}

impl Default for GlossConfig {
    fn default() -> Self {
        Self {
            strategy: GlossStrategy::default(),
            rules_path: default_rules_path(),
            lowercase_input: true,
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable the Prometheus recorder and /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (ISL_GLOSS_ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(
            File::with_name(&format!("config/{}", env_name)).required(false),
        );
    }

    builder = builder.add_source(
        Environment::with_prefix("ISL_GLOSS")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.gloss.strategy, GlossStrategy::ContentWords);
        assert!(settings.gloss.lowercase_input);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let settings: Settings = serde_json::from_str(
            r#"{"server": {"port": 9000}, "gloss": {"strategy": "sov"}}"#,
        )
        .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.gloss.strategy, GlossStrategy::SubjectObjectVerb);
        assert_eq!(settings.annotation.model, "en_core_web_sm");
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.annotation.endpoint = "localhost:8001".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "annotation.endpoint"
        ));

        let mut settings = Settings::default();
        settings.transcription.endpoint = String::new();
        assert!(settings.validate().is_ok());

        let mut settings = Settings::default();
        settings.transcription.timeout_seconds = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.gloss.rules_path = Some("rules.json".to_string());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_shipped_default_config_matches_defaults() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                include_str!("../../../config/default.yaml"),
                config::FileFormat::Yaml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let defaults = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.server.port, defaults.server.port);
        assert_eq!(settings.server.max_audio_bytes, defaults.server.max_audio_bytes);
        assert_eq!(settings.annotation.endpoint, defaults.annotation.endpoint);
        assert_eq!(settings.transcription.language, defaults.transcription.language);
        assert_eq!(settings.gloss.rules_path, defaults.gloss.rules_path);
        assert_eq!(settings.gloss.strategy, defaults.gloss.strategy);
    }
}
