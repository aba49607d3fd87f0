//! Gloss rules definition and loading
//!
//! Everything the mapper treats as linguistic curation lives here rather than
//! in the mapping code: which parts of speech count as content words, which
//! dependency relations mark negation, what gets elided, and the synonym table.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use isl_gloss_core::{DependencyRelation, PartOfSpeech};

use super::SynonymTable;
use crate::{Result, TextProcessingError};

/// Gloss rules structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossRules {
    /// Version of rules
    #[serde(default = "default_version")]
    pub version: String,

    /// Parts of speech kept as content words
    #[serde(default = "default_accepted_pos")]
    pub accepted_pos: HashSet<PartOfSpeech>,

    /// Dependency relations that emit the negation marker
    #[serde(default = "default_negation_relations")]
    pub negation_relations: HashSet<DependencyRelation>,

    /// Lemmas dropped from the gloss (the copula)
    #[serde(default = "default_elided_lemmas")]
    pub elided_lemmas: Vec<String>,

    /// Surface forms that stand for a negation (apostrophe-stripped contractions)
    #[serde(default = "default_negation_contractions")]
    pub negation_contractions: Vec<String>,

    /// Gloss emitted for every negation
    #[serde(default = "default_negation_marker")]
    pub negation_marker: String,

    /// Synonym table applied after mapping
    #[serde(default = "default_synonyms")]
    pub synonyms: SynonymTable,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_accepted_pos() -> HashSet<PartOfSpeech> {
    [
        PartOfSpeech::Noun,
        PartOfSpeech::ProperNoun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adjective,
        PartOfSpeech::Interjection,
        PartOfSpeech::Pronoun,
        PartOfSpeech::Adverb,
    ]
    .into_iter()
    .collect()
}

fn default_negation_relations() -> HashSet<DependencyRelation> {
    [DependencyRelation::Negation].into_iter().collect()
}

fn default_elided_lemmas() -> Vec<String> {
    vec!["be".to_string()]
}

fn default_negation_contractions() -> Vec<String> {
    vec!["dont".to_string()]
}

fn default_negation_marker() -> String {
    "NOT".to_string()
}

fn default_synonyms() -> SynonymTable {
    SynonymTable::from_pairs([
        ("FOOD", "EAT"),
        ("HOME", "HOUSE"),
        ("MINE", "MY"),
        ("MYSELF", "I"),
        ("HEY", "HELLO"),
        ("HI", "HELLO"),
    ])
}

impl Default for GlossRules {
    fn default() -> Self {
        default_rules()
    }
}

impl GlossRules {
    /// Whether `pos` is a content-word part of speech
    pub fn accepts(&self, pos: PartOfSpeech) -> bool {
        self.accepted_pos.contains(&pos)
    }

    /// Whether `relation` marks a negation
    pub fn is_negation(&self, relation: DependencyRelation) -> bool {
        self.negation_relations.contains(&relation)
    }

    /// Whether `lemma` is dropped from the gloss
    pub fn is_elided(&self, lemma: &str) -> bool {
        self.elided_lemmas.iter().any(|l| l == lemma)
    }

    /// Whether the surface form is a negation contraction
    pub fn is_negation_contraction(&self, text: &str) -> bool {
        self.negation_contractions.iter().any(|c| c == text)
    }

    /// Validate rules
    ///
    /// Returns every problem found rather than stopping at the first.
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.negation_marker.trim().is_empty() {
            errors.push("negation_marker must not be empty".to_string());
        } else if self.negation_marker.to_uppercase() != self.negation_marker {
            errors.push(format!(
                "negation_marker '{}' must be uppercase",
                self.negation_marker
            ));
        }

        if self.accepted_pos.contains(&PartOfSpeech::Other) {
            errors.push(
                "accepted_pos contains an unrecognised tag; only NOUN, PROPN, VERB, ADJ, INTJ, PRON, ADV and PUNCT are understood"
                    .to_string(),
            );
        }

        if self.negation_relations.contains(&DependencyRelation::Other) {
            errors.push(
                "negation_relations contains an unrecognised label; only neg is understood as negation"
                    .to_string(),
            );
        }

        // Input is lowercased before annotation
        for lemma in self.elided_lemmas.iter().filter(|l| l.to_lowercase() != **l) {
            errors.push(format!("elided lemma '{}' must be lowercase", lemma));
        }
        for form in self
            .negation_contractions
            .iter()
            .filter(|c| c.to_lowercase() != **c)
        {
            errors.push(format!("negation contraction '{}' must be lowercase", form));
        }

        for (key, value) in self.synonyms.non_uppercase_entries() {
            errors.push(format!("synonym '{}' -> '{}' must be uppercase", key, value));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Non-fatal observations about the rules
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.synonyms.is_single_pass_stable() {
            warnings.push(
                "synonym table chains (a replacement is also a key); normalization applies only one lookup"
                    .to_string(),
            );
        }

        if self.accepted_pos.is_empty() {
            warnings.push("accepted_pos is empty; every sentence will use the surface-text fallback".to_string());
        }

        warnings
    }
}

/// Load rules from a YAML or TOML file (chosen by extension)
pub fn load_rules(path: impl AsRef<Path>) -> Result<GlossRules> {
    let path = path.as_ref();
    let shown = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|source| TextProcessingError::RulesRead {
        path: shown.clone(),
        source,
    })?;

    let rules: GlossRules = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| TextProcessingError::RulesParse {
            path: shown.clone(),
            message: e.to_string(),
        })?,
        _ => serde_yaml::from_str(&content).map_err(|e| TextProcessingError::RulesParse {
            path: shown.clone(),
            message: e.to_string(),
        })?,
    };

    rules.validate().map_err(TextProcessingError::InvalidRules)?;

    for warning in rules.warnings() {
        tracing::warn!(path = %shown, "{}", warning);
    }

    tracing::info!(
        path = %shown,
        version = %rules.version,
        synonyms = rules.synonyms.len(),
        "Loaded gloss rules"
    );

    Ok(rules)
}

/// Get the built-in gloss rules
pub fn default_rules() -> GlossRules {
    GlossRules {
        version: default_version(),
        accepted_pos: default_accepted_pos(),
        negation_relations: default_negation_relations(),
        elided_lemmas: default_elided_lemmas(),
        negation_contractions: default_negation_contractions(),
        negation_marker: default_negation_marker(),
        synonyms: default_synonyms(),
    }
}
