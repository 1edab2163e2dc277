//! Report types for the analysis pipeline and the display rules that turn
//! raw scores into tiers, confidence levels and recommendations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::documents::DocumentKind;
use crate::matching::classifier::{FitLabel, FitPrediction};
use crate::matching::scorer::MatchResult;
use crate::skills::extraction::ExtractionMode;
use crate::skills::SkillSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityTier {
    Outstanding,
    Excellent,
    Good,
    Moderate,
    GrowthOpportunity,
}

impl CompatibilityTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            CompatibilityTier::Outstanding
        } else if score >= 60.0 {
            CompatibilityTier::Excellent
        } else if score >= 40.0 {
            CompatibilityTier::Good
        } else if score >= 20.0 {
            CompatibilityTier::Moderate
        } else {
            CompatibilityTier::GrowthOpportunity
        }
    }

    pub fn message(self, score: f64) -> String {
        match self {
            CompatibilityTier::Outstanding => {
                format!("Outstanding match! You have {score:.1}% skill compatibility")
            }
            CompatibilityTier::Excellent => {
                format!("Excellent match! {score:.1}% skill compatibility")
            }
            CompatibilityTier::Good => {
                format!("Good match with growth potential: {score:.1}% compatibility")
            }
            CompatibilityTier::Moderate => format!(
                "Moderate match - skill development recommended: {score:.1}% compatibility"
            ),
            CompatibilityTier::GrowthOpportunity => format!(
                "Growth opportunity - consider targeted skill development: {score:.1}% compatibility"
            ),
        }
    }
}

/// Confidence bucket over the Fit-class probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.8 {
            ConfidenceLevel::High
        } else if probability > 0.6 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FitAssessment {
    pub prediction: FitPrediction,
    pub display_label: &'static str,
    pub confidence: ConfidenceLevel,
    pub recommendation: &'static str,
}

impl FitAssessment {
    pub fn from_prediction(prediction: FitPrediction) -> Self {
        let (display_label, recommendation) = match prediction.label {
            FitLabel::Fit => (
                "Strong Candidate",
                "You have a strong foundation for this role. Consider highlighting your \
                 matched skills in your application.",
            ),
            FitLabel::NoFit => (
                "Needs Development",
                "Focus on developing the missing skills through courses, projects, or \
                 certifications to improve your candidacy.",
            ),
        };

        Self {
            prediction,
            display_label,
            confidence: ConfidenceLevel::from_probability(prediction.probability),
            recommendation,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchAnalysis {
    #[serde(flatten)]
    pub match_result: MatchResult,
    pub tier: CompatibilityTier,
    pub tier_message: String,
    pub fit: FitAssessment,
    /// Course links for missing skills that have one.
    pub learning_resources: BTreeMap<String, String>,
    pub skills_without_resources: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysis {
    pub kind: DocumentKind,
    pub source_name: Option<String>,
    pub word_count: usize,
    pub char_count: usize,
    pub skills: SkillSet,
    pub extraction_mode: ExtractionMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    /// Extraction mode chosen at startup.
    pub extraction_mode: ExtractionMode,
    pub resume: Option<DocumentAnalysis>,
    pub job_description: Option<DocumentAnalysis>,
    /// Present only when both documents yielded skills.
    pub skill_match: Option<MatchAnalysis>,
    pub warnings: Vec<String>,
}
