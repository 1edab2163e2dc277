//! Skill extraction capability with a one-shot fallback.
//!
//! Which extractor is primary is decided once, at startup: the annotated
//! extractor when its resource loads, otherwise the keyword extractor for the
//! rest of the process. A per-call failure of the annotated extractor is caught
//! here and replaced by the keyword result; nothing propagates past `extract`.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::annotated::AnnotatedSkillExtractor;
use super::keyword::KeywordSkillExtractor;
use super::lexicon::SkillLexicon;
use super::{ExtractorError, SkillExtractor, SkillSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    Annotated,
    Keyword,
}

impl ExtractionMode {
    pub fn label(self) -> &'static str {
        match self {
            ExtractionMode::Annotated => "Annotated phrase matching",
            ExtractionMode::Keyword => "Basic keyword matching",
        }
    }
}

/// Skills found in one text plus how they were found.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    pub skills: SkillSet,
    pub mode: ExtractionMode,
    /// Set when the annotated extractor failed and keyword output was used.
    pub warning: Option<String>,
}

pub struct SkillExtraction {
    mode: ExtractionMode,
    primary: Option<Arc<dyn SkillExtractor>>,
    keyword: KeywordSkillExtractor,
}

impl SkillExtraction {
    /// Builds the capability. `annotator_path = None` disables the annotated
    /// extractor outright.
    pub fn initialize(
        lexicon: Arc<SkillLexicon>,
        annotator_path: Option<&Path>,
    ) -> Result<Self, ExtractorError> {
        let keyword = KeywordSkillExtractor::new(lexicon.clone())?;

        let primary: Option<Arc<dyn SkillExtractor>> = annotator_path.and_then(|path| {
            let annotated = AnnotatedSkillExtractor::load(path, lexicon);
            annotated
                .is_available()
                .then(|| Arc::new(annotated) as Arc<dyn SkillExtractor>)
        });

        let extraction = Self::with_primary(keyword, primary);
        info!(
            mode = extraction.mode.label(),
            lexicon_size = extraction.keyword.pattern_count(),
            "Skill extraction initialized"
        );
        Ok(extraction)
    }

    /// Keyword-only capability.
    pub fn keyword_only(lexicon: Arc<SkillLexicon>) -> Result<Self, ExtractorError> {
        Ok(Self::with_primary(KeywordSkillExtractor::new(lexicon)?, None))
    }

    /// Uses `primary` as given; the caller has already decided it is available.
    pub fn with_primary(
        keyword: KeywordSkillExtractor,
        primary: Option<Arc<dyn SkillExtractor>>,
    ) -> Self {
        let mode = if primary.is_some() {
            ExtractionMode::Annotated
        } else {
            ExtractionMode::Keyword
        };
        Self {
            mode,
            primary,
            keyword,
        }
    }

    pub fn mode(&self) -> ExtractionMode {
        self.mode
    }

    pub fn extract(&self, text: &str) -> ExtractionOutcome {
        let Some(primary) = &self.primary else {
            return ExtractionOutcome {
                skills: self.keyword.extract_skills(text),
                mode: ExtractionMode::Keyword,
                warning: None,
            };
        };

        match primary.extract(text) {
            Ok(skills) => ExtractionOutcome {
                skills,
                mode: ExtractionMode::Annotated,
                warning: None,
            },
            Err(err) => {
                warn!(extractor = primary.name(), error = %err, "Falling back to keyword extraction");
                ExtractionOutcome {
                    skills: self.keyword.extract_skills(text),
                    mode: ExtractionMode::Keyword,
                    warning: Some(format!(
                        "Annotated extraction failed, falling back to basic extraction: {err}"
                    )),
                }
            }
        }
    }
}
