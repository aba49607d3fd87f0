//! Gloss pipeline: mapper followed by synonym normalization

use std::sync::Arc;

use isl_gloss_core::{AnnotatedToken, GlossStrategy, GlossToken};

use crate::gloss::{GlossMapper, GlossRules};

/// Result of running the pipeline over one sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossOutput {
    /// Mapper output before synonym normalization
    pub raw: Vec<GlossToken>,
    /// Final gloss
    pub gloss: Vec<GlossToken>,
    /// Strategy that produced the gloss
    pub strategy: GlossStrategy,
}

/// Mapper + normalizer, sharing one set of rules
///
/// Pure and `Send + Sync`: one instance serves every request.
#[derive(Debug, Clone)]
pub struct GlossPipeline {
    mapper: GlossMapper,
    rules: Arc<GlossRules>,
}

impl GlossPipeline {
    pub fn new(rules: Arc<GlossRules>) -> Self {
        Self {
            mapper: GlossMapper::new(rules.clone()),
            rules,
        }
    }

    /// Map tokens and normalize the result
    pub fn process(&self, tokens: &[AnnotatedToken], strategy: GlossStrategy) -> GlossOutput {
        let raw = self.mapper.map(tokens, strategy);
        let gloss = self.normalize(&raw);

        tracing::debug!(
            strategy = %strategy,
            tokens = tokens.len(),
            raw = ?raw,
            gloss = ?gloss,
            "Mapped sentence to gloss"
        );

        GlossOutput {
            raw,
            gloss,
            strategy,
        }
    }

    /// Apply the synonym table once to every token
    pub fn normalize(&self, gloss: &[GlossToken]) -> Vec<GlossToken> {
        self.rules.synonyms.normalize(gloss)
    }
}

impl Default for GlossPipeline {
    fn default() -> Self {
        Self::new(Arc::new(GlossRules::default()))
    }
}
