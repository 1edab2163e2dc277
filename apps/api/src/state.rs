use std::sync::Arc;

use crate::analysis::AnalysisEngine;
use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::skills::lexicon::SkillLexicon;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub lexicon: Arc<SkillLexicon>,
    /// Extraction capability and fit classifier, both fixed at startup.
    pub engine: AnalysisEngine,
    /// LLM backend for the advice generators. Swappable for tests.
    pub llm: Arc<dyn TextGenerator>,
}
