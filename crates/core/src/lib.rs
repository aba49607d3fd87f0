//! Core traits and types for the ISL gloss service
//!
//! This crate provides foundational types used across all other crates:
//! - Annotated tokens as produced by the linguistic parser
//! - Gloss tokens and gloss strategies
//! - Error types
//! - Collaborator traits (annotation, transcription)

pub mod error;
pub mod gloss;
pub mod token;
pub mod traits;

pub use error::{Error, Result};
pub use gloss::{GlossStrategy, GlossToken};
pub use token::{AnnotatedToken, DependencyRelation, PartOfSpeech};
pub use traits::{SpeechToText, TokenAnnotator};
