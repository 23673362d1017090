use std::path::PathBuf;

use flapper_learn::{
    search::{self, DEFAULT_TRIALS},
    split::DEFAULT_SEED,
};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TuneArg {
    /// Split written by `prepare` (JSON)
    input: PathBuf,
    /// Classifier output path (JSON)
    #[arg(long, default_value = "./data/classifier.json")]
    output: PathBuf,
    /// Number of random-search trials
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    trials: usize,
    /// Seed for sampling hyperparameters
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Name stored in the saved model
    #[arg(long, default_value = "forest")]
    name: String,
}

pub(crate) fn run(arg: &TuneArg) -> anyhow::Result<()> {
    let TuneArg {
        input,
        output,
        trials,
        seed,
        name,
    } = arg;

    let split = util::read_split(input)?;
    let space = search::SearchSpace::default();
    let (artifact, outcome) = search::tune(name, &split, &space, *trials, *seed, |trial| {
        eprintln!(
            "Trial #{:2}: F1 {:.4} <= {:?}",
            trial.number, trial.score, trial.params
        );
    })?;
    Output::save_json(&artifact, Some(output.as_path()))?;

    eprintln!();
    eprintln!("Model saved successfully");
    eprintln!("  Path: {}", output.display());
    eprintln!("  Name: {}", artifact.name);
    eprintln!("  Trained at: {}", artifact.trained_at);
    eprintln!("  Best trial: #{}", outcome.best.number);
    eprintln!("  Trial F1: {:.4}", artifact.trial_score);
    eprintln!("  Params: {:?}", artifact.params());
    Ok(())
}
