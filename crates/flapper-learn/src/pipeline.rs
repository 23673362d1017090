//! The offline steps chained in memory: clean, prepare, tune, evaluate.

use serde::{Deserialize, Serialize};

use crate::{
    clean::{Cleaned, clean},
    dataset::RawRecord,
    evaluate::{Evaluation, evaluate},
    forest::FitError,
    search::{ClassifierArtifact, DEFAULT_TRIALS, SearchOutcome, SearchSpace, tune},
    split::{
        DEFAULT_NEIGHBORS, DEFAULT_SEED, DEFAULT_TEST_FRACTION, PreparedSplit, SmoteError, prepare,
    },
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PipelineError {
    #[display("no valid rows left after cleaning")]
    #[from(skip)]
    NothingLeft,
    #[display("balancing failed: {_0}")]
    Smote(SmoteError),
    #[display("fitting failed: {_0}")]
    Fit(FitError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub test_fraction: f32,
    pub seed: u64,
    pub neighbors: usize,
    pub trials: usize,
    pub search_seed: u64,
    pub space: SearchSpace,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            neighbors: DEFAULT_NEIGHBORS,
            trials: DEFAULT_TRIALS,
            search_seed: DEFAULT_SEED,
            space: SearchSpace::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub cleaned: Cleaned,
    pub split: PreparedSplit,
    pub artifact: ClassifierArtifact,
    pub search: SearchOutcome,
    pub evaluation: Evaluation,
}

pub fn run(
    name: &str,
    records: &[RawRecord],
    options: &PipelineOptions,
) -> Result<PipelineOutput, PipelineError> {
    let cleaned = clean(records).ok_or(PipelineError::NothingLeft)?;
    tracing::info!(report = ?cleaned.report, "cleaned");
    let split = prepare(
        &cleaned.samples,
        options.test_fraction,
        options.seed,
        options.neighbors,
    )?;
    tracing::info!(
        train = split.train.len(),
        test = split.test.len(),
        "prepared split"
    );
    let (artifact, search) = tune(
        name,
        &split,
        &options.space,
        options.trials,
        options.search_seed,
        |trial| tracing::info!(number = trial.number, score = trial.score, "trial"),
    )?;
    let evaluation = evaluate(&artifact.forest, &split.test);
    tracing::info!(accuracy = evaluation.report.accuracy, "evaluated");
    Ok(PipelineOutput {
        cleaned,
        split,
        artifact,
        search,
        evaluation,
    })
}
