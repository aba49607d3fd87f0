//! Synonym table for gloss normalization
//!
//! Maps one gloss to the sign that should be used for it (FOOD → EAT).
//! Lookups are case-sensitive and applied exactly once per token; the table
//! is never iterated to a fixed point.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use isl_gloss_core::GlossToken;

/// Gloss-to-gloss replacement table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynonymTable {
    entries: BTreeMap<String, String>,
}

impl SynonymTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(gloss, replacement)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Add or replace an entry
    pub fn insert(&mut self, gloss: impl Into<String>, replacement: impl Into<String>) {
        self.entries.insert(gloss.into(), replacement.into());
    }

    /// Replacement for `gloss`, if any
    pub fn lookup(&self, gloss: &str) -> Option<&str> {
        self.entries.get(gloss).map(String::as_str)
    }

    /// Apply one lookup to every token, in order
    pub fn normalize(&self, tokens: &[GlossToken]) -> Vec<GlossToken> {
        tokens
            .iter()
            .map(|token| match self.lookup(token.as_str()) {
                Some(replacement) => GlossToken::new(replacement),
                None => token.clone(),
            })
            .collect()
    }

    /// True when no replacement is itself a key
    ///
    /// Only then is a single pass of [`normalize`](Self::normalize) a fixed
    /// point.
    pub fn is_single_pass_stable(&self) -> bool {
        self.entries
            .values()
            .all(|value| !self.entries.contains_key(value))
    }

    /// Entries whose key or value is not uppercase
    pub fn non_uppercase_entries(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .filter(|(k, v)| k.to_uppercase() != **k || v.to_uppercase() != **v)
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gloss(words: &[&str]) -> Vec<GlossToken> {
        words.iter().map(|w| GlossToken::new(w)).collect()
    }

    #[test]
    fn test_normalize_replaces_known_tokens() {
        let table = SynonymTable::from_pairs([("FOOD", "EAT"), ("HI", "HELLO")]);
        let result = table.normalize(&gloss(&["HI", "I", "WANT", "FOOD"]));
        assert_eq!(result, vec!["HELLO", "I", "WANT", "EAT"]);
    }

    #[test]
    fn test_normalize_is_single_lookup() {
        // A -> B -> C must stop at B
        let table = SynonymTable::from_pairs([("A", "B"), ("B", "C")]);
        assert_eq!(table.normalize(&gloss(&["A"])), vec!["B"]);
        assert!(!table.is_single_pass_stable());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = SynonymTable::from_pairs([("HOME", "HOUSE")]);
        assert_eq!(table.lookup("HOME"), Some("HOUSE"));
        assert_eq!(table.lookup("home"), None);
    }

    #[test]
    fn test_non_uppercase_entries() {
        let mut table = SynonymTable::new();
        table.insert("HOME", "HOUSE");
        table.insert("food", "EAT");
        assert_eq!(table.non_uppercase_entries(), vec![("food", "EAT")]);
    }

    #[test]
    fn test_empty_input() {
        let table = SynonymTable::from_pairs([("HI", "HELLO")]);
        assert!(table.normalize(&[]).is_empty());
    }
}
