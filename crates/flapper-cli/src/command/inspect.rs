use std::path::PathBuf;

use flapper_learn::inspect::DatasetProfile;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct InspectArg {
    /// Telemetry CSV to profile
    input: PathBuf,
    /// Print the profile as JSON
    #[arg(long)]
    json: bool,
}

pub(crate) fn run(arg: &InspectArg) -> anyhow::Result<()> {
    let InspectArg { input, json } = arg;
    let records = util::read_raw_records(input)?;
    let profile = DatasetProfile::new(&records);
    if *json {
        Output::save_json(&profile, None)?;
    } else {
        println!("{profile}");
    }
    Ok(())
}
