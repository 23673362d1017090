//! Bagged ensembles of [`DecisionTree`]s.

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    dataset::{CLASS_COUNT, FEATURE_COUNT, Sample, class_counts},
    tree::{DecisionTree, TreeParams, argmax},
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum FitError {
    #[display("cannot fit on an empty training set")]
    Empty,
    #[display("training set contains only class {label}")]
    SingleClass { label: u8 },
    #[display("n_estimators must be at least 1")]
    NoEstimators,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum ClassWeight {
    #[default]
    #[display("none")]
    None,
    /// Weights each class by `n / (classes * count)`.
    #[display("balanced")]
    Balanced,
}

impl ClassWeight {
    pub const ALL: [Self; 2] = [Self::None, Self::Balanced];

    /// One weight per sample.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn sample_weights(self, samples: &[Sample]) -> Vec<f32> {
        match self {
            Self::None => vec![1.0; samples.len()],
            Self::Balanced => {
                let counts = class_counts(samples);
                let n = samples.len() as f32;
                let per_class = counts.map(|c| {
                    if c == 0 {
                        0.0
                    } else {
                        n / (CLASS_COUNT as f32 * c as f32)
                    }
                });
                samples
                    .iter()
                    .map(|s| per_class[usize::from(s.label)])
                    .collect()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    #[serde(default)]
    pub class_weight: ClassWeight,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            class_weight: ClassWeight::None,
        }
    }
}

impl ForestParams {
    /// Per-tree parameters; each split looks at `floor(sqrt(FEATURE_COUNT))` features.
    #[must_use]
    pub fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: Some(FEATURE_COUNT.isqrt()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    seed: u64,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fits `params.n_estimators` trees, each on a bootstrap sample.
    ///
    /// Bootstrap draws and feature subsets all come from one PCG32
    /// generator seeded with `seed`, so equal inputs give equal forests.
    pub fn fit(samples: &[Sample], params: &ForestParams, seed: u64) -> Result<Self, FitError> {
        if params.n_estimators == 0 {
            return Err(FitError::NoEstimators);
        }
        if samples.is_empty() {
            return Err(FitError::Empty);
        }
        let counts = class_counts(samples);
        if let Some(only) = counts.iter().position(|&c| c == samples.len()) {
            return Err(FitError::SingleClass {
                label: u8::try_from(only).unwrap_or(u8::MAX),
            });
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let weights = params.class_weight.sample_weights(samples);
        let tree_params = params.tree_params();
        let n = samples.len();
        let trees = (0..params.n_estimators)
            .map(|_| {
                let bootstrap = (0..n).map(|_| rng.random_range(0..n)).collect::<Vec<_>>();
                DecisionTree::fit(samples, &weights, &bootstrap, &tree_params, &mut rng)
            })
            .collect::<Vec<_>>();
        tracing::trace!(trees = trees.len(), seed, "fitted random forest");
        Ok(Self {
            params: params.clone(),
            seed,
            trees,
        })
    }

    #[must_use]
    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Mean of the trees' leaf class probabilities.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn predict_proba(&self, features: &[f32; FEATURE_COUNT]) -> [f32; CLASS_COUNT] {
        let mut sum = [0.0; CLASS_COUNT];
        for tree in &self.trees {
            for (acc, p) in sum.iter_mut().zip(tree.predict_proba(features)) {
                *acc += p;
            }
        }
        let count = self.trees.len().max(1) as f32;
        sum.map(|s| s / count)
    }

    #[must_use]
    pub fn predict(&self, features: &[f32; FEATURE_COUNT]) -> u8 {
        argmax(&self.predict_proba(features))
    }

    #[must_use]
    pub fn predict_all(&self, samples: &[Sample]) -> Vec<u8> {
        samples.iter().map(|s| self.predict(&s.features)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable(n: u16) -> Vec<Sample> {
        (0..n)
            .map(|i| {
                let x = f32::from(i) / f32::from(n);
                Sample {
                    features: [x, 0.5, 1.0 - x, f32::from(i % 3) / 2.0],
                    label: u8::from(x > 0.7),
                }
            })
            .collect()
    }

    #[test]
    fn test_fit_rejects_degenerate_sets() {
        let params = ForestParams::default();
        assert_eq!(RandomForest::fit(&[], &params, 0), Err(FitError::Empty));
        let single = separable(10)
            .into_iter()
            .filter(|s| s.label == 0)
            .collect::<Vec<_>>();
        assert_eq!(
            RandomForest::fit(&single, &params, 0),
            Err(FitError::SingleClass { label: 0 })
        );
        let none = ForestParams {
            n_estimators: 0,
            ..ForestParams::default()
        };
        assert_eq!(
            RandomForest::fit(&separable(10), &none, 0),
            Err(FitError::NoEstimators)
        );
    }

    #[test]
    fn test_forest_separates_threshold() {
        let data = separable(200);
        let params = ForestParams {
            n_estimators: 15,
            ..ForestParams::default()
        };
        let forest = RandomForest::fit(&data, &params, 42).unwrap();
        assert_eq!(forest.trees().len(), 15);
        assert_eq!(forest.predict(&[0.1, 0.5, 0.9, 0.0]), 0);
        assert_eq!(forest.predict(&[0.95, 0.5, 0.05, 0.0]), 1);
        let proba = forest.predict_proba(&[0.95, 0.5, 0.05, 0.0]);
        assert!((proba.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let data = separable(120);
        let params = ForestParams {
            n_estimators: 8,
            max_depth: Some(4),
            ..ForestParams::default()
        };
        let a = RandomForest::fit(&data, &params, 7).unwrap();
        let b = RandomForest::fit(&data, &params, 7).unwrap();
        assert_eq!(a, b);
        assert!(a.trees().iter().all(|t| t.depth() <= 4));
    }

    #[test]
    fn test_balanced_weights() {
        let samples = [0, 0, 0, 1].map(|label| Sample {
            features: [0.0; 4],
            label,
        });
        let weights = ClassWeight::Balanced.sample_weights(&samples);
        assert_eq!(weights, vec![4.0 / 6.0, 4.0 / 6.0, 4.0 / 6.0, 2.0]);
        assert_eq!(ClassWeight::None.sample_weights(&samples), vec![1.0; 4]);
    }

    #[test]
    fn test_params_serde_names() {
        let params = ForestParams {
            class_weight: ClassWeight::Balanced,
            ..ForestParams::default()
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["class_weight"], "balanced");
        assert_eq!(json["max_depth"], serde_json::Value::Null);
    }
}
