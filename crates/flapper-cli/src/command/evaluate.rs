use std::path::PathBuf;

use flapper_learn::evaluate;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Classifier written by `tune` (JSON)
    model_path: PathBuf,
    /// Split written by `prepare` (JSON)
    #[arg(long, default_value = "./data/split.json")]
    split: PathBuf,
    /// Results table output path (CSV)
    #[arg(long, default_value = "./data/results.csv")]
    output: PathBuf,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        model_path,
        split,
        output,
    } = arg;

    let classifier = util::read_classifier(model_path)?;
    let split = util::read_split(split)?;
    let evaluation = evaluate::evaluate(&classifier.forest, &split.test);
    util::write_predictions(output, &evaluation.predictions)?;

    tracing::info!(accuracy = evaluation.report.accuracy, "evaluated");
    println!("Accuracy: {:.4}", evaluation.report.accuracy);
    println!();
    println!("{}", evaluation.report);
    println!("Confusion matrix:");
    println!("{}", evaluation.report.confusion);
    eprintln!();
    eprintln!("Results saved to {}", output.display());
    Ok(())
}
