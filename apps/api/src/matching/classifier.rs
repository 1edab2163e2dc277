//! Fit Classifier: random forest over (match score, matched count, missing count).
//!
//! The model is calibrated on a fixed synthetic table, not on real outcomes.
//! It is loaded from a JSON artifact when one is present and valid; otherwise
//! it is retrained from the table (same seed, same forest) and the artifact
//! is rewritten. A corrupt artifact is never reported to callers.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::forest::{Features, RandomForest};

pub const TRAINING_SEED: u64 = 42;
pub const N_TREES: usize = 50;
const ARTIFACT_FORMAT_VERSION: u32 = 1;
/// Match score at or above which a synthetic row is labeled Fit.
const FIT_THRESHOLD: f64 = 50.0;

static SHARED_CLASSIFIER: OnceLock<Arc<FitClassifier>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitLabel {
    Fit,
    NoFit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitPrediction {
    pub label: FitLabel,
    /// Estimated likelihood of the Fit class, in [0, 1].
    pub probability: f64,
}

/// One row of the calibration table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingRow {
    pub match_score: f64,
    pub matched_count: usize,
    pub missing_count: usize,
    pub fit: bool,
}

/// The 11-row calibration table: scores 100, 90, …, 0 with matched = score / 10
/// and missing = 10 − matched.
pub fn training_table() -> Vec<TrainingRow> {
    (0..=10usize)
        .rev()
        .map(|matched| {
            let match_score = matched as f64 * 10.0;
            TrainingRow {
                match_score,
                matched_count: matched,
                missing_count: 10 - matched,
                fit: match_score >= FIT_THRESHOLD,
            }
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Classifier artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Classifier artifact is corrupt: {0}")]
    Corrupt(String),
}

impl From<serde_json::Error> for ArtifactError {
    fn from(err: serde_json::Error) -> Self {
        ArtifactError::Corrupt(err.to_string())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ClassifierArtifact {
    format_version: u32,
    trained_at: DateTime<Utc>,
    seed: u64,
    forest: RandomForest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSource {
    Artifact,
    Trained,
}

#[derive(Debug)]
pub struct FitClassifier {
    forest: RandomForest,
    trained_at: DateTime<Utc>,
    source: ModelSource,
}

impl FitClassifier {
    /// Trains a fresh model from the calibration table.
    pub fn train() -> Self {
        let rows = training_table();
        let samples: Vec<Features> = rows
            .iter()
            .map(|r| features(r.match_score, r.matched_count, r.missing_count))
            .collect();
        let labels: Vec<bool> = rows.iter().map(|r| r.fit).collect();

        Self {
            forest: RandomForest::fit(&samples, &labels, N_TREES, TRAINING_SEED),
            trained_at: Utc::now(),
            source: ModelSource::Trained,
        }
    }

    /// Process-wide classifier, loaded or trained on first call. Later calls
    /// return the same instance regardless of `artifact_path`.
    pub fn shared(artifact_path: &Path) -> Arc<FitClassifier> {
        SHARED_CLASSIFIER
            .get_or_init(|| Arc::new(FitClassifier::load_or_train(artifact_path)))
            .clone()
    }

    /// Loads the artifact at `path`, or retrains and rewrites it when the
    /// artifact is absent or unreadable.
    pub fn load_or_train(path: &Path) -> Self {
        match Self::load(path) {
            Ok(classifier) => {
                info!(path = %path.display(), trained_at = %classifier.trained_at, "Fit classifier loaded");
                return classifier;
            }
            Err(ArtifactError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No fit classifier artifact, training");
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Discarding fit classifier artifact, retraining");
            }
        }

        let classifier = Self::train();
        if let Err(err) = classifier.save(path) {
            warn!(path = %path.display(), error = %err, "Could not write fit classifier artifact");
        }
        classifier
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let raw = std::fs::read_to_string(path)?;
        let artifact: ClassifierArtifact = serde_json::from_str(&raw)?;
        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::Corrupt(format!(
                "unsupported format version {}",
                artifact.format_version
            )));
        }
        artifact.forest.validate().map_err(ArtifactError::Corrupt)?;

        Ok(Self {
            forest: artifact.forest,
            trained_at: artifact.trained_at,
            source: ModelSource::Artifact,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let artifact = ClassifierArtifact {
            format_version: ARTIFACT_FORMAT_VERSION,
            trained_at: self.trained_at,
            seed: TRAINING_SEED,
            forest: self.forest.clone(),
        };
        std::fs::write(path, serde_json::to_vec(&artifact)?)?;
        Ok(())
    }

    pub fn predict(
        &self,
        match_score: f64,
        matched_count: usize,
        missing_count: usize,
    ) -> FitPrediction {
        let probability = self
            .forest
            .predict_proba(&features(match_score, matched_count, missing_count));
        let label = if probability > 0.5 {
            FitLabel::Fit
        } else {
            FitLabel::NoFit
        };
        FitPrediction { label, probability }
    }

    pub fn source(&self) -> ModelSource {
        self.source
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }
}

fn features(match_score: f64, matched_count: usize, missing_count: usize) -> Features {
    [match_score, matched_count as f64, missing_count as f64]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_table_shape() {
        let rows = training_table();
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0].match_score, 100.0);
        assert_eq!(rows[0].matched_count, 10);
        assert_eq!(rows[0].missing_count, 0);
        assert_eq!(rows[10].match_score, 0.0);
        assert_eq!(rows[10].missing_count, 10);
        assert_eq!(rows.iter().filter(|r| r.fit).count(), 6);
        assert!(rows.iter().all(|r| r.fit == (r.match_score >= 50.0)));
    }

    #[test]
    fn test_full_match_predicts_fit() {
        let prediction = FitClassifier::train().predict(100.0, 10, 0);
        assert_eq!(prediction.label, FitLabel::Fit);
        assert!(prediction.probability > 0.5);
    }

    #[test]
    fn test_zero_match_predicts_no_fit() {
        let prediction = FitClassifier::train().predict(0.0, 0, 10);
        assert_eq!(prediction.label, FitLabel::NoFit);
        assert!(prediction.probability < 0.5);
    }

    #[test]
    fn test_training_is_deterministic() {
        let a = FitClassifier::train();
        let b = FitClassifier::train();
        assert_eq!(a.forest, b.forest);
        for score in [0.0, 25.0, 45.0, 55.0, 75.0, 100.0] {
            assert_eq!(a.predict(score, 3, 3), b.predict(score, 3, 3));
        }
    }

    #[test]
    fn test_missing_artifact_trains_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models/fit_classifier.json");

        let classifier = FitClassifier::load_or_train(&path);
        assert_eq!(classifier.source(), ModelSource::Trained);
        assert!(path.exists());

        let reloaded = FitClassifier::load_or_train(&path);
        assert_eq!(reloaded.source(), ModelSource::Artifact);
        assert_eq!(reloaded.forest, classifier.forest);
    }

    #[test]
    fn test_corrupt_artifact_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fit_classifier.json");
        std::fs::write(&path, b"\x00\x01 definitely not json").unwrap();

        assert!(matches!(FitClassifier::load(&path), Err(ArtifactError::Corrupt(_))));

        let classifier = FitClassifier::load_or_train(&path);
        assert_eq!(classifier.source(), ModelSource::Trained);
        assert_eq!(classifier.predict(100.0, 10, 0).label, FitLabel::Fit);
        assert!(FitClassifier::load(&path).is_ok());
    }

    #[test]
    fn test_wrong_format_version_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fit_classifier.json");
        FitClassifier::train().save(&path).unwrap();

        let mut value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        value["format_version"] = serde_json::json!(99);
        std::fs::write(&path, value.to_string()).unwrap();

        assert!(matches!(FitClassifier::load(&path), Err(ArtifactError::Corrupt(_))));
    }

    #[test]
    fn test_probability_is_bounded() {
        let classifier = FitClassifier::train();
        for row in training_table() {
            let p = classifier
                .predict(row.match_score, row.matched_count, row.missing_count)
                .probability;
            assert!((0.0..=1.0).contains(&p));
        }
    }
}
