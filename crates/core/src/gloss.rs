//! Gloss tokens and gloss construction strategies

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One uppercase ISL gloss token
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlossToken(String);

impl GlossToken {
    /// Build a gloss token, uppercasing the input
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().to_uppercase())
    }

    /// Borrow the token text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GlossToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for GlossToken {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for GlossToken {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<&str> for GlossToken {
    fn from(value: &str) -> Self {
        GlossToken::new(value)
    }
}

impl From<String> for GlossToken {
    fn from(value: String) -> Self {
        GlossToken::new(value)
    }
}

impl fmt::Display for GlossToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the gloss sequence is built from annotated tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlossStrategy {
    /// Order-preserving content-word filter with negation (canonical)
    #[default]
    ContentWords,
    /// Earlier revision: subject, object, verb extracted from the root's children
    #[serde(alias = "sov")]
    SubjectObjectVerb,
}

impl GlossStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlossStrategy::ContentWords => "content_words",
            GlossStrategy::SubjectObjectVerb => "subject_object_verb",
        }
    }
}

impl FromStr for GlossStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "content_words" | "content-words" => Ok(GlossStrategy::ContentWords),
            "subject_object_verb" | "subject-object-verb" | "sov" => {
                Ok(GlossStrategy::SubjectObjectVerb)
            }
            other => Err(format!("unknown gloss strategy '{}'", other)),
        }
    }
}

impl fmt::Display for GlossStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gloss_token_uppercases() {
        let token = GlossToken::new("read");
        assert_eq!(token, "READ");
        assert_eq!(token.to_string(), "READ");
    }

    #[test]
    fn test_gloss_token_serializes_as_string() {
        let tokens = vec![GlossToken::new("she"), GlossToken::new("read")];
        let json = serde_json::to_string(&tokens).unwrap();
        assert_eq!(json, r#"["SHE","READ"]"#);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("sov".parse::<GlossStrategy>().unwrap(), GlossStrategy::SubjectObjectVerb);
        assert_eq!(
            "content_words".parse::<GlossStrategy>().unwrap(),
            GlossStrategy::ContentWords
        );
        assert!("reorder".parse::<GlossStrategy>().is_err());
        assert_eq!(GlossStrategy::default(), GlossStrategy::ContentWords);
    }

    #[test]
    fn test_strategy_serde() {
        let strategy: GlossStrategy = serde_json::from_str(r#""sov""#).unwrap();
        assert_eq!(strategy, GlossStrategy::SubjectObjectVerb);
        assert_eq!(
            serde_json::to_string(&GlossStrategy::ContentWords).unwrap(),
            r#""content_words""#
        );
    }
}
