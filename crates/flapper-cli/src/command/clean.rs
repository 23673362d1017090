use std::path::PathBuf;

use anyhow::Context as _;
use flapper_learn::clean;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CleanArg {
    /// Telemetry CSV to clean
    input: PathBuf,
    /// Cleaned CSV output path
    #[arg(long, default_value = "./data/cleaned.csv")]
    output: PathBuf,
    /// Normalization params output path (JSON)
    #[arg(long, default_value = "./data/normalization.json")]
    normalization: PathBuf,
}

pub(crate) fn run(arg: &CleanArg) -> anyhow::Result<()> {
    let CleanArg {
        input,
        output,
        normalization,
    } = arg;

    let records = util::read_raw_records(input)?;
    let cleaned = clean::clean(&records)
        .with_context(|| format!("No valid rows left in {}", input.display()))?;
    util::write_clean_samples(output, &cleaned.samples)?;
    Output::save_json(&cleaned.params, Some(normalization.as_path()))?;

    let report = &cleaned.report;
    tracing::info!(?report, "cleaned telemetry");
    eprintln!("Cleaned {} rows", report.input_rows);
    eprintln!("  Dropped invalid:    {}", report.dropped_invalid);
    eprintln!("  Dropped duplicates: {}", report.dropped_duplicates);
    eprintln!("  Kept:               {}", report.output_rows);
    eprintln!("  Samples: {}", output.display());
    eprintln!("  Normalization: {}", normalization.display());
    Ok(())
}
