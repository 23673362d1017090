use std::path::PathBuf;

use flapper_engine::GameConfig;
use flapper_neuro::config::EvolutionConfig;

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct InitConfigArg {
    /// Write the game config instead of the evolution config
    #[arg(long)]
    game: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &InitConfigArg) -> anyhow::Result<()> {
    let InitConfigArg { game, output } = arg;
    if *game {
        Output::save_json(&GameConfig::default(), output.as_deref())?;
    } else {
        Output::save_json(&EvolutionConfig::default(), output.as_deref())?;
    }
    if let Some(path) = output {
        eprintln!("Default config written to {}", path.display());
    }
    Ok(())
}
