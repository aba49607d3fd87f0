//! Gloss mapping and synonym normalization

mod mapper;
mod rules;
mod synonyms;

pub use mapper::GlossMapper;
pub use rules::{default_rules, load_rules, GlossRules};
pub use synonyms::SynonymTable;
