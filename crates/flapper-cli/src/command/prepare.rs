use std::path::PathBuf;

use flapper_learn::{
    dataset,
    split::{self, DEFAULT_NEIGHBORS, DEFAULT_SEED, DEFAULT_TEST_FRACTION},
};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PrepareArg {
    /// Cleaned CSV written by `clean`
    input: PathBuf,
    /// Split output path (JSON)
    #[arg(long, default_value = "./data/split.json")]
    output: PathBuf,
    /// Fraction of rows held out for testing
    #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
    test_fraction: f32,
    /// Seed for the shuffle and the oversampling
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Neighbours considered when synthesizing minority samples
    #[arg(long, default_value_t = DEFAULT_NEIGHBORS)]
    neighbors: usize,
}

pub(crate) fn run(arg: &PrepareArg) -> anyhow::Result<()> {
    let PrepareArg {
        input,
        output,
        test_fraction,
        seed,
        neighbors,
    } = arg;

    let samples = util::read_clean_samples(input)?;
    let prepared = split::prepare(&samples, *test_fraction, *seed, *neighbors)?;
    Output::save_json(&prepared, Some(output.as_path()))?;

    let [idle, jump] = prepared.original_train_counts;
    let [balanced_idle, balanced_jump] = dataset::class_counts(&prepared.train);
    eprintln!("Split saved successfully");
    eprintln!("  Path: {}", output.display());
    eprintln!("  Train: {idle} idle / {jump} jump before balancing");
    eprintln!("  Train: {balanced_idle} idle / {balanced_jump} jump after balancing");
    eprintln!("  Test:  {} rows", prepared.test.len());
    Ok(())
}
