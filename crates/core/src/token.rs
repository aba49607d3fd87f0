//! Annotated token types produced by the linguistic parser

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse part-of-speech tag
///
/// Parsed from Universal POS tags (`NOUN`, `PROPN`, `VERB`, ...). Tags outside
/// the recognised set collapse into [`PartOfSpeech::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Verb,
    Adjective,
    Interjection,
    Pronoun,
    Adverb,
    Punctuation,
    Other,
}

impl PartOfSpeech {
    /// Parse a Universal POS tag (case-insensitive)
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "NOUN" => PartOfSpeech::Noun,
            "PROPN" => PartOfSpeech::ProperNoun,
            "VERB" => PartOfSpeech::Verb,
            "ADJ" => PartOfSpeech::Adjective,
            "INTJ" => PartOfSpeech::Interjection,
            "PRON" => PartOfSpeech::Pronoun,
            "ADV" => PartOfSpeech::Adverb,
            "PUNCT" => PartOfSpeech::Punctuation,
            _ => PartOfSpeech::Other,
        }
    }

    /// Universal POS tag for this part of speech
    pub fn as_tag(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::ProperNoun => "PROPN",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::Adjective => "ADJ",
            PartOfSpeech::Interjection => "INTJ",
            PartOfSpeech::Pronoun => "PRON",
            PartOfSpeech::Adverb => "ADV",
            PartOfSpeech::Punctuation => "PUNCT",
            PartOfSpeech::Other => "X",
        }
    }
}

impl From<String> for PartOfSpeech {
    fn from(tag: String) -> Self {
        PartOfSpeech::from_tag(&tag)
    }
}

impl From<PartOfSpeech> for String {
    fn from(pos: PartOfSpeech) -> Self {
        pos.as_tag().to_string()
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Syntactic role of a token relative to its head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DependencyRelation {
    Root,
    NominalSubject,
    DirectObject,
    Negation,
    Other,
}

impl DependencyRelation {
    /// Parse a dependency label
    ///
    /// Accepts both the ClearNLP labels spaCy's English models emit (`dobj`,
    /// `neg`, `ROOT`) and the Universal Dependencies spelling (`obj`, `root`).
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "ROOT" | "root" => DependencyRelation::Root,
            "nsubj" => DependencyRelation::NominalSubject,
            "dobj" | "obj" => DependencyRelation::DirectObject,
            "neg" => DependencyRelation::Negation,
            _ => DependencyRelation::Other,
        }
    }

    /// Canonical label for this relation
    pub fn as_label(&self) -> &'static str {
        match self {
            DependencyRelation::Root => "ROOT",
            DependencyRelation::NominalSubject => "nsubj",
            DependencyRelation::DirectObject => "dobj",
            DependencyRelation::Negation => "neg",
            DependencyRelation::Other => "dep",
        }
    }
}

impl From<String> for DependencyRelation {
    fn from(label: String) -> Self {
        DependencyRelation::from_label(&label)
    }
}

impl From<DependencyRelation> for String {
    fn from(rel: DependencyRelation) -> Self {
        rel.as_label().to_string()
    }
}

impl fmt::Display for DependencyRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// One word or punctuation unit of a parsed sentence
///
/// Field names on the wire follow spaCy's token attributes (`pos`, `dep`,
/// `is_stop`, `is_punct`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedToken {
    /// Surface form as written
    pub text: String,

    /// Base/dictionary form
    pub lemma: String,

    /// Coarse part-of-speech tag
    #[serde(rename = "pos")]
    pub part_of_speech: PartOfSpeech,

    /// Dependency relation to the head token
    #[serde(rename = "dep")]
    pub dependency_relation: DependencyRelation,

    /// Index of the head token (the root points to itself)
    #[serde(default)]
    pub head: usize,

    /// High-frequency function word
    #[serde(rename = "is_stop", default)]
    pub is_stop_word: bool,

    /// Punctuation mark
    #[serde(rename = "is_punct", default)]
    pub is_punctuation: bool,
}

impl AnnotatedToken {
    /// Create a token with no dependency structure
    ///
    /// The relation defaults to [`DependencyRelation::Other`], the head to 0
    /// and the punctuation flag follows the part of speech.
    pub fn new(
        text: impl Into<String>,
        lemma: impl Into<String>,
        part_of_speech: PartOfSpeech,
    ) -> Self {
        Self {
            text: text.into(),
            lemma: lemma.into(),
            part_of_speech,
            dependency_relation: DependencyRelation::Other,
            head: 0,
            is_stop_word: false,
            is_punctuation: part_of_speech == PartOfSpeech::Punctuation,
        }
    }

    /// Set the dependency relation
    pub fn with_dependency(mut self, relation: DependencyRelation) -> Self {
        self.dependency_relation = relation;
        self
    }

    /// Set the head index
    pub fn with_head(mut self, head: usize) -> Self {
        self.head = head;
        self
    }

    /// Mark as stop word
    pub fn with_stop_word(mut self, is_stop_word: bool) -> Self {
        self.is_stop_word = is_stop_word;
        self
    }

    /// Mark as punctuation
    pub fn with_punctuation(mut self, is_punctuation: bool) -> Self {
        self.is_punctuation = is_punctuation;
        self
    }

    /// Whether this token is a negation modifier
    pub fn is_negation(&self) -> bool {
        self.dependency_relation == DependencyRelation::Negation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_from_tag() {
        assert_eq!(PartOfSpeech::from_tag("NOUN"), PartOfSpeech::Noun);
        assert_eq!(PartOfSpeech::from_tag("propn"), PartOfSpeech::ProperNoun);
        assert_eq!(PartOfSpeech::from_tag("PUNCT"), PartOfSpeech::Punctuation);
        assert_eq!(PartOfSpeech::from_tag("DET"), PartOfSpeech::Other);
        assert_eq!(PartOfSpeech::from_tag("ADP"), PartOfSpeech::Other);
    }

    #[test]
    fn test_dependency_from_label() {
        assert_eq!(DependencyRelation::from_label("ROOT"), DependencyRelation::Root);
        assert_eq!(DependencyRelation::from_label("obj"), DependencyRelation::DirectObject);
        assert_eq!(DependencyRelation::from_label("neg"), DependencyRelation::Negation);
        assert_eq!(DependencyRelation::from_label("aux"), DependencyRelation::Other);
    }

    #[test]
    fn test_deserialize_spacy_token() {
        let json = r#"{
            "text": "not",
            "lemma": "not",
            "pos": "PART",
            "dep": "neg",
            "head": 2,
            "is_stop": true,
            "is_punct": false
        }"#;

        let token: AnnotatedToken = serde_json::from_str(json).unwrap();
        assert_eq!(token.part_of_speech, PartOfSpeech::Other);
        assert!(token.is_negation());
        assert_eq!(token.head, 2);
        assert!(token.is_stop_word);
    }

    #[test]
    fn test_missing_flags_default_false() {
        let json = r#"{"text": ".", "lemma": ".", "pos": "PUNCT", "dep": "punct"}"#;
        let token: AnnotatedToken = serde_json::from_str(json).unwrap();
        assert!(!token.is_punctuation);
        assert!(!token.is_stop_word);
        assert_eq!(token.head, 0);
    }

    #[test]
    fn test_builder_sets_punctuation_from_pos() {
        let token = AnnotatedToken::new("!", "!", PartOfSpeech::Punctuation);
        assert!(token.is_punctuation);

        let token = AnnotatedToken::new("book", "book", PartOfSpeech::Noun)
            .with_dependency(DependencyRelation::DirectObject)
            .with_head(1);
        assert!(!token.is_punctuation);
        assert_eq!(token.head, 1);
    }
}
