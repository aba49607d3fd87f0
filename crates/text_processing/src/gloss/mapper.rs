//! English-to-ISL gloss mapper
//!
//! Two strategies:
//!
//! - [`GlossStrategy::ContentWords`] (canonical): walk the sentence in surface
//!   order, keep content words as uppercased lemmas, turn negations into the
//!   negation marker, drop the copula. Falls back to the surface text when
//!   nothing survives the filter.
//! - [`GlossStrategy::SubjectObjectVerb`] (legacy): pull the subject and
//!   direct object off the root verb and emit them in SOV order.

use std::sync::Arc;

use isl_gloss_core::{AnnotatedToken, DependencyRelation, GlossStrategy, GlossToken, PartOfSpeech};

use super::GlossRules;

/// Maps annotated tokens to raw (pre-synonym) gloss
#[derive(Debug, Clone)]
pub struct GlossMapper {
    rules: Arc<GlossRules>,
}

impl GlossMapper {
    pub fn new(rules: Arc<GlossRules>) -> Self {
        Self { rules }
    }

    /// Map tokens with the given strategy
    pub fn map(&self, tokens: &[AnnotatedToken], strategy: GlossStrategy) -> Vec<GlossToken> {
        match strategy {
            GlossStrategy::ContentWords => self.map_content_words(tokens),
            GlossStrategy::SubjectObjectVerb => self.map_subject_object_verb(tokens),
        }
    }

    /// Order-preserving content-word extraction with negation
    pub fn map_content_words(&self, tokens: &[AnnotatedToken]) -> Vec<GlossToken> {
        let mut gloss = Vec::with_capacity(tokens.len());

        for token in tokens {
            if self.rules.is_negation(token.dependency_relation) {
                gloss.push(self.negation_marker());
                continue;
            }

            // Pronouns are accepted regardless of the stop-word flag
            if !self.rules.accepts(token.part_of_speech) {
                continue;
            }

            if self.rules.is_elided(&token.lemma) {
                continue;
            }

            if self.rules.is_negation_contraction(&token.text) {
                gloss.push(self.negation_marker());
            } else {
                gloss.push(GlossToken::new(&token.lemma));
            }
        }

        if gloss.is_empty() {
            return surface_fallback(tokens);
        }

        gloss
    }

    /// Legacy subject-object-verb extraction via the root's children
    ///
    /// When several roots are present (multi-sentence input) the last one
    /// wins, and a subject or object found under an earlier root is kept
    /// unless a later root supplies its own.
    pub fn map_subject_object_verb(&self, tokens: &[AnnotatedToken]) -> Vec<GlossToken> {
        let mut subject = "";
        let mut object = "";
        let mut verb = "";

        for (index, token) in tokens.iter().enumerate() {
            if token.dependency_relation != DependencyRelation::Root {
                continue;
            }

            verb = &token.lemma;
            let children = tokens
                .iter()
                .enumerate()
                .filter(|(i, child)| *i != index && child.head == index)
                .map(|(_, child)| child);

            for child in children {
                match child.dependency_relation {
                    DependencyRelation::NominalSubject => subject = &child.text,
                    DependencyRelation::DirectObject => object = &child.text,
                    _ => {}
                }
            }
        }

        if verb.is_empty() {
            return tokens.iter().map(|t| GlossToken::new(&t.text)).collect();
        }

        [subject, object, verb]
            .into_iter()
            .filter(|word| !word.is_empty())
            .map(GlossToken::new)
            .collect()
    }

    fn negation_marker(&self) -> GlossToken {
        GlossToken::new(&self.rules.negation_marker)
    }
}

/// Uppercase surface text of every non-punctuation token
fn surface_fallback(tokens: &[AnnotatedToken]) -> Vec<GlossToken> {
    tokens
        .iter()
        .filter(|t| !t.is_punctuation && t.part_of_speech != PartOfSpeech::Punctuation)
        .filter(|t| !t.text.trim().is_empty())
        .map(|t| GlossToken::new(&t.text))
        .collect()
}
