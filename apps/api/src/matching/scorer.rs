//! Match Scorer: set overlap between a candidate's and a role's skills.

use serde::{Deserialize, Serialize};

use crate::skills::SkillSet;

/// Overlap between candidate and required skills.
///
/// `matched = candidate ∩ required`, `missing = required − candidate`,
/// `extra = candidate − required`, `score = 100 · |matched| / |required|`.
/// An empty requirement scores 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: SkillSet,
    pub missing: SkillSet,
    pub extra: SkillSet,
    pub score: f64,
}

impl MatchResult {
    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }
}

pub fn score(candidate: &SkillSet, required: &SkillSet) -> MatchResult {
    let matched: SkillSet = candidate.intersection(required).cloned().collect();
    let missing: SkillSet = required.difference(candidate).cloned().collect();
    let extra: SkillSet = candidate.difference(required).cloned().collect();

    let score = if required.is_empty() {
        0.0
    } else {
        100.0 * matched.len() as f64 / required.len() as f64
    };

    MatchResult {
        matched,
        missing,
        extra,
        score,
    }
}
