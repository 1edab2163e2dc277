//! Random forest of CART trees for binary labels.
//!
//! Trees use Gini impurity, bootstrap resampling and `sqrt(n_features)`
//! candidate features per split, and grow until every leaf is pure. A
//! seeded `StdRng` makes training reproducible. The whole forest serializes
//! with serde so it can be persisted as a JSON artifact.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const N_FEATURES: usize = 3;

pub type Features = [f64; N_FEATURES];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        /// Share of positive samples that reached this leaf.
        positive_rate: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn positive_rate(&self, x: &Features) -> f64 {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { positive_rate } => return *positive_rate,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            Node::Leaf { positive_rate } => {
                if (0.0..=1.0).contains(positive_rate) {
                    Ok(())
                } else {
                    Err(format!("leaf probability {positive_rate} out of range"))
                }
            }
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= N_FEATURES {
                    return Err(format!("split on unknown feature {feature}"));
                }
                if !threshold.is_finite() {
                    return Err("non-finite split threshold".to_string());
                }
                left.validate()?;
                right.validate()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<Node>,
}

impl RandomForest {
    pub fn fit(samples: &[Features], labels: &[bool], n_trees: usize, seed: u64) -> Self {
        debug_assert_eq!(samples.len(), labels.len(), "one label per sample");
        let mut rng = StdRng::seed_from_u64(seed);
        let n = samples.len();

        let trees = (0..n_trees)
            .map(|_| {
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                grow(samples, labels, &bootstrap, &mut rng)
            })
            .collect();

        Self { trees }
    }

    /// Mean positive-class probability across trees.
    pub fn predict_proba(&self, x: &Features) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: f64 = self.trees.iter().map(|t| t.positive_rate(x)).sum();
        total / self.trees.len() as f64
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        self.trees.iter().try_for_each(Node::validate)
    }
}

fn grow(samples: &[Features], labels: &[bool], indices: &[usize], rng: &mut StdRng) -> Node {
    let positives = indices.iter().filter(|&&i| labels[i]).count();
    let leaf = Node::Leaf {
        positive_rate: positives as f64 / indices.len() as f64,
    };
    if positives == 0 || positives == indices.len() {
        return leaf;
    }

    // Draw features in random order; the first `max_features` are the
    // candidates, the rest are only tried if none of those can split.
    let mut order: Vec<usize> = (0..N_FEATURES).collect();
    order.shuffle(rng);
    let max_features = ((N_FEATURES as f64).sqrt() as usize).max(1);

    let mut best = best_split(samples, labels, indices, &order[..max_features]);
    if best.is_none() {
        best = best_split(samples, labels, indices, &order[max_features..]);
    }
    let Some(split) = best else {
        return leaf;
    };

    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .partition(|&&i| samples[i][split.feature] <= split.threshold);

    Node::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: Box::new(grow(samples, labels, &left, rng)),
        right: Box::new(grow(samples, labels, &right, rng)),
    }
}

struct Split {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

/// Lowest weighted Gini split over `features`, thresholds at midpoints
/// between consecutive distinct values.
fn best_split(
    samples: &[Features],
    labels: &[bool],
    indices: &[usize],
    features: &[usize],
) -> Option<Split> {
    let mut best: Option<Split> = None;

    for &feature in features {
        let mut values: Vec<f64> = indices.iter().map(|&i| samples[i][feature]).collect();
        values.sort_by(f64::total_cmp);
        values.dedup();

        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;
            let impurity = weighted_gini(samples, labels, indices, feature, threshold);
            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                best = Some(Split {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }
    }
    best
}

fn weighted_gini(
    samples: &[Features],
    labels: &[bool],
    indices: &[usize],
    feature: usize,
    threshold: f64,
) -> f64 {
    let (mut left_n, mut left_pos, mut right_n, mut right_pos) = (0usize, 0usize, 0usize, 0usize);
    for &i in indices {
        if samples[i][feature] <= threshold {
            left_n += 1;
            left_pos += usize::from(labels[i]);
        } else {
            right_n += 1;
            right_pos += usize::from(labels[i]);
        }
    }
    let total = indices.len() as f64;
    (left_n as f64 / total) * gini(left_pos, left_n) + (right_n as f64 / total) * gini(right_pos, right_n)
}

fn gini(positives: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = positives as f64 / n as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}
