use std::path::PathBuf;

use flapper_learn::{
    pipeline::{self, PipelineOptions},
    search::DEFAULT_TRIALS,
    split::{DEFAULT_NEIGHBORS, DEFAULT_SEED, DEFAULT_TEST_FRACTION},
};

use crate::util::{self, Output};

/// Runs clean, prepare, tune and evaluate in one go.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PipelineArg {
    /// Telemetry CSV to learn from
    input: PathBuf,
    /// Directory receiving every intermediate artifact
    #[arg(long, default_value = "./data/")]
    out_dir: PathBuf,
    #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
    test_fraction: f32,
    /// Seed for the shuffle and the oversampling
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    #[arg(long, default_value_t = DEFAULT_NEIGHBORS)]
    neighbors: usize,
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    trials: usize,
    /// Seed for sampling hyperparameters
    #[arg(long, default_value_t = DEFAULT_SEED)]
    search_seed: u64,
    /// Name stored in the saved model
    #[arg(long, default_value = "forest")]
    name: String,
}

pub(crate) fn run(arg: &PipelineArg) -> anyhow::Result<()> {
    let PipelineArg {
        input,
        out_dir,
        test_fraction,
        seed,
        neighbors,
        trials,
        search_seed,
        name,
    } = arg;

    let records = util::read_raw_records(input)?;
    let options = PipelineOptions {
        test_fraction: *test_fraction,
        seed: *seed,
        neighbors: *neighbors,
        trials: *trials,
        search_seed: *search_seed,
        ..PipelineOptions::default()
    };
    let output = pipeline::run(name, &records, &options)?;

    util::write_clean_samples(&out_dir.join("cleaned.csv"), &output.cleaned.samples)?;
    let normalization_path = out_dir.join("normalization.json");
    Output::save_json(&output.cleaned.params, Some(&normalization_path))?;
    let split_path = out_dir.join("split.json");
    Output::save_json(&output.split, Some(&split_path))?;
    let classifier_path = out_dir.join("classifier.json");
    Output::save_json(&output.artifact, Some(&classifier_path))?;
    util::write_predictions(
        &out_dir.join("results.csv"),
        &output.evaluation.predictions,
    )?;

    let report = &output.evaluation.report;
    println!("Accuracy: {:.4}", report.accuracy);
    println!();
    println!("{report}");
    println!("Confusion matrix:");
    println!("{}", report.confusion);
    eprintln!();
    eprintln!("Artifacts saved to {}", out_dir.display());
    Ok(())
}
