//! Seeded random search over random-forest hyperparameters.
//!
//! Every trial fits a forest on the balanced training set and scores it by
//! the F1 of the jump class on the held-out test set. The best parameters
//! are refitted with [`REFIT_SEED`] and packaged as a [`ClassifierArtifact`].

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    dataset::FEATURE_COUNT,
    forest::{ClassWeight, FitError, ForestParams, RandomForest},
    metrics::ClassificationReport,
    split::PreparedSplit,
};

pub const DEFAULT_TRIALS: usize = 50;
/// Seed used for every trial's forest and for the final refit.
pub const REFIT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSpace {
    pub n_estimators: RangeInclusive<usize>,
    pub max_depth: RangeInclusive<usize>,
    pub min_samples_split: RangeInclusive<usize>,
    pub min_samples_leaf: RangeInclusive<usize>,
    pub class_weights: Vec<ClassWeight>,
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            n_estimators: 10..=100,
            max_depth: 3..=20,
            min_samples_split: 2..=20,
            min_samples_leaf: 1..=10,
            class_weights: ClassWeight::ALL.to_vec(),
        }
    }
}

impl SearchSpace {
    pub fn sample<R>(&self, rng: &mut R) -> ForestParams
    where
        R: Rng + ?Sized,
    {
        let class_weight = if self.class_weights.is_empty() {
            ClassWeight::None
        } else {
            self.class_weights[rng.random_range(0..self.class_weights.len())]
        };
        ForestParams {
            n_estimators: rng.random_range(self.n_estimators.clone()),
            max_depth: Some(rng.random_range(self.max_depth.clone())),
            min_samples_split: rng.random_range(self.min_samples_split.clone()),
            min_samples_leaf: rng.random_range(self.min_samples_leaf.clone()),
            class_weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub number: usize,
    pub params: ForestParams,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub best: Trial,
    pub trials: Vec<Trial>,
}

/// Runs `trials` random trials (at least one). Ties keep the earlier trial.
pub fn random_search<F>(
    split: &PreparedSplit,
    space: &SearchSpace,
    trials: usize,
    seed: u64,
    mut on_trial: F,
) -> Result<SearchOutcome, FitError>
where
    F: FnMut(&Trial),
{
    let mut rng = Pcg32::seed_from_u64(seed);
    let actual = split.test.iter().map(|s| s.label).collect::<Vec<_>>();

    let mut history = Vec::with_capacity(trials);
    let mut best: Option<Trial> = None;
    for number in 0..trials.max(1) {
        let params = space.sample(&mut rng);
        let forest = RandomForest::fit(&split.train, &params, REFIT_SEED)?;
        let predicted = forest.predict_all(&split.test);
        let score = ClassificationReport::new(&actual, &predicted).positive_f1();
        let trial = Trial {
            number,
            params,
            score,
        };
        tracing::debug!(number, score, params = ?trial.params, "trial finished");
        on_trial(&trial);
        if best.as_ref().is_none_or(|b| trial.score > b.score) {
            best = Some(trial.clone());
        }
        history.push(trial);
    }
    let best = best.ok_or(FitError::NoEstimators)?;
    Ok(SearchOutcome {
        best,
        trials: history,
    })
}

/// Fitted classifier written by `tune` and read by `evaluate` and `auto-play`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    /// Test-set F1 of the jump class achieved by the best trial.
    pub trial_score: f32,
    pub trials: usize,
    pub forest: RandomForest,
}

impl ClassifierArtifact {
    #[must_use]
    pub fn params(&self) -> &ForestParams {
        self.forest.params()
    }

    #[must_use]
    pub fn predict(&self, features: &[f32; FEATURE_COUNT]) -> u8 {
        self.forest.predict(features)
    }
}

/// Searches, then refits the winning parameters with [`REFIT_SEED`].
pub fn tune<F>(
    name: &str,
    split: &PreparedSplit,
    space: &SearchSpace,
    trials: usize,
    seed: u64,
    on_trial: F,
) -> Result<(ClassifierArtifact, SearchOutcome), FitError>
where
    F: FnMut(&Trial),
{
    let outcome = random_search(split, space, trials, seed, on_trial)?;
    let forest = RandomForest::fit(&split.train, &outcome.best.params, REFIT_SEED)?;
    tracing::info!(
        score = outcome.best.score,
        trial = outcome.best.number,
        "best hyperparameters refitted"
    );
    let artifact = ClassifierArtifact {
        name: name.to_owned(),
        trained_at: Utc::now(),
        trial_score: outcome.best.score,
        trials: outcome.trials.len(),
        forest,
    };
    Ok((artifact, outcome))
}
