//! Analysis pipeline: documents → skills → match → fit → resources.

pub mod handlers;
pub mod report;

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::advice::resources::{get_learning_resources, skills_without_resources};
use crate::documents::Document;
use crate::matching::classifier::FitClassifier;
use crate::matching::scorer::score;
use crate::skills::extraction::{ExtractionMode, ExtractionOutcome, SkillExtraction};
use crate::skills::SkillSet;

use report::{AnalysisReport, CompatibilityTier, DocumentAnalysis, FitAssessment, MatchAnalysis};

/// The read-only pieces every analysis needs. Cheap to clone.
#[derive(Clone)]
pub struct AnalysisEngine {
    extraction: Arc<SkillExtraction>,
    classifier: Arc<FitClassifier>,
}

impl AnalysisEngine {
    pub fn new(extraction: Arc<SkillExtraction>, classifier: Arc<FitClassifier>) -> Self {
        Self {
            extraction,
            classifier,
        }
    }

    pub fn extraction_mode(&self) -> ExtractionMode {
        self.extraction.mode()
    }

    pub fn extract_skills(&self, text: &str) -> ExtractionOutcome {
        self.extraction.extract(text)
    }

    pub fn classifier(&self) -> &FitClassifier {
        &self.classifier
    }

    /// Scores `candidate` against `required`, predicts fit and looks up
    /// resources for the missing skills.
    pub fn assess_match(&self, candidate: &SkillSet, required: &SkillSet) -> MatchAnalysis {
        let match_result = score(candidate, required);
        let prediction = self.classifier.predict(
            match_result.score,
            match_result.matched_count(),
            match_result.missing_count(),
        );
        let tier = CompatibilityTier::from_score(match_result.score);
        let learning_resources = get_learning_resources(&match_result.missing);
        let skills_without_resources =
            skills_without_resources(&match_result.missing, &learning_resources);

        MatchAnalysis {
            tier,
            tier_message: tier.message(match_result.score),
            fit: FitAssessment::from_prediction(prediction),
            learning_resources,
            skills_without_resources,
            match_result,
        }
    }

    /// Full analysis of whichever documents are present. `warnings` carries
    /// problems found before this point (unreadable uploads and the like).
    pub fn analyze(
        &self,
        resume: Option<&Document>,
        job_description: Option<&Document>,
        mut warnings: Vec<String>,
    ) -> AnalysisReport {
        let resume = resume.map(|doc| self.analyze_document(doc, &mut warnings));
        let job_description = job_description.map(|doc| self.analyze_document(doc, &mut warnings));

        let skill_match = match (&resume, &job_description) {
            (Some(r), Some(j)) if !r.skills.is_empty() && !j.skills.is_empty() => {
                Some(self.assess_match(&r.skills, &j.skills))
            }
            _ => None,
        };

        let report = AnalysisReport {
            analysis_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            extraction_mode: self.extraction.mode(),
            resume,
            job_description,
            skill_match,
            warnings,
        };

        info!(
            analysis_id = %report.analysis_id,
            score = report.skill_match.as_ref().map(|m| m.match_result.score),
            warnings = report.warnings.len(),
            "Analysis complete"
        );
        report
    }

    fn analyze_document(&self, doc: &Document, warnings: &mut Vec<String>) -> DocumentAnalysis {
        let outcome = self.extraction.extract(&doc.text);
        if let Some(warning) = outcome.warning {
            warnings.push(warning);
        }
        if outcome.skills.is_empty() {
            warnings.push(format!(
                "No common technical skills detected in {}",
                doc.kind.label()
            ));
        }

        DocumentAnalysis {
            kind: doc.kind,
            source_name: doc.source_name.clone(),
            word_count: doc.word_count(),
            char_count: doc.char_count(),
            skills: outcome.skills,
            extraction_mode: outcome.mode,
        }
    }
}
