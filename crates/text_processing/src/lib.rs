//! Gloss mapping for the ISL gloss service
//!
//! This crate turns annotated English tokens into Indian Sign Language gloss:
//! - **Gloss Mapper**: content-word extraction with negation handling, plus the
//!   legacy subject-object-verb mode
//! - **Synonym Normalizer**: single-pass lookup through a curated table
//! - **Gloss Rules**: the data (accepted POS, negation markers, synonyms) the
//!   mapper runs on, loadable from YAML or TOML
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use isl_gloss_core::{AnnotatedToken, GlossStrategy, PartOfSpeech};
//! use isl_gloss_text_processing::{GlossPipeline, GlossRules};
//!
//! let pipeline = GlossPipeline::new(Arc::new(GlossRules::default()));
//! let tokens = vec![
//!     AnnotatedToken::new("hi", "hi", PartOfSpeech::Interjection),
//!     AnnotatedToken::new("!", "!", PartOfSpeech::Punctuation),
//! ];
//!
//! let output = pipeline.process(&tokens, GlossStrategy::ContentWords);
//! assert_eq!(output.gloss, vec!["HELLO"]);
//! ```

pub mod gloss;

mod error;
mod pipeline;

pub use error::{Result, TextProcessingError};
pub use gloss::{default_rules, load_rules, GlossMapper, GlossRules, SynonymTable};
pub use pipeline::{GlossOutput, GlossPipeline};
