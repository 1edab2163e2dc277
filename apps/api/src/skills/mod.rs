// Skill detection: the static lexicon and the two extractors that match it.
// Callers go through `extraction::SkillExtraction`, which owns the fallback policy.

pub mod annotated;
pub mod extraction;
pub mod keyword;
pub mod lexicon;

use std::collections::BTreeSet;

use thiserror::Error;

/// Lowercase canonical skill strings attributed to one document.
pub type SkillSet = BTreeSet<String>;

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("Annotator model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Annotation failed: {0}")]
    Annotation(String),

    #[error("Invalid skill pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A skill extraction strategy. Both implementations return canonical
/// lexicon entries; only the annotated one can fail.
pub trait SkillExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, text: &str) -> Result<SkillSet, ExtractorError>;
}
