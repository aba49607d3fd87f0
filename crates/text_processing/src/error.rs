//! Error types for gloss processing

use thiserror::Error;

/// Gloss processing errors
#[derive(Debug, Error)]
pub enum TextProcessingError {
    /// Rules file could not be read
    #[error("Failed to read gloss rules from {path}: {source}")]
    RulesRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Rules file could not be parsed
    #[error("Failed to parse gloss rules from {path}: {message}")]
    RulesParse { path: String, message: String },

    /// Rules parsed but are not usable
    #[error("Invalid gloss rules: {}", .0.join("; "))]
    InvalidRules(Vec<String>),
}

impl From<TextProcessingError> for isl_gloss_core::Error {
    fn from(err: TextProcessingError) -> Self {
        isl_gloss_core::Error::config(err.to_string())
    }
}

/// Result type for gloss processing
pub type Result<T> = std::result::Result<T, TextProcessingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rules_become_config_error() {
        let err = TextProcessingError::InvalidRules(vec!["accepted_pos is empty".to_string()]);
        let core: isl_gloss_core::Error = err.into();

        assert!(matches!(core, isl_gloss_core::Error::Config(_)));
        assert!(!core.is_client_error());
        assert!(core.to_string().contains("accepted_pos is empty"));
    }
}
