use std::path::PathBuf;

use anyhow::Context as _;
use flapper_engine::{CourseSeed, Episode, EpisodeBudget};
use flapper_neuro::network::NetworkController;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::util;

/// Flies a trained genome without a screen to build a telemetry dataset.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RecordArg {
    /// Path to the genome model file (JSON format)
    model_path: PathBuf,
    /// Telemetry CSV to append to
    #[arg(long, default_value = "./data/telemetry.csv")]
    telemetry: PathBuf,
    /// Number of episodes to fly
    #[arg(long, default_value_t = 10)]
    episodes: usize,
    /// Tick limit per episode
    #[arg(long, default_value_t = 3000)]
    max_ticks: u64,
    /// Seed for the courses (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Game config file (JSON); defaults are used when omitted
    #[arg(long)]
    game_config: Option<PathBuf>,
}

pub(crate) fn run(arg: &RecordArg) -> anyhow::Result<()> {
    let RecordArg {
        model_path,
        telemetry,
        episodes,
        max_ticks,
        seed,
        game_config,
    } = arg;

    let model = util::read_genome_model(model_path)?;
    let game = util::read_game_config(game_config.as_deref())?;
    let mut writer = util::open_telemetry(telemetry)?;
    let seed = seed.unwrap_or_else(rand::random);
    tracing::info!(seed, model = %model.name, "recording started");
    let mut rng = Pcg32::seed_from_u64(seed);

    let budget = EpisodeBudget {
        max_ticks: Some(*max_ticks),
        max_score: None,
    };
    let mut controllers = [NetworkController::new(model.genome.clone())];
    for index in 0..*episodes {
        let course: CourseSeed = rng.random();
        let mut episode = Episode::new(game.clone(), course, 1, budget)?;
        while episode.state().is_running() {
            let report = episode.step(&mut controllers);
            writer
                .append_all(&report.telemetry)
                .context("Failed to append telemetry")?;
        }
        eprintln!(
            "Episode #{index}: score {} in {} ticks ({:?})",
            episode.score(),
            episode.tick(),
            episode.state()
        );
    }
    writer.flush().context("Failed to flush telemetry")?;

    eprintln!();
    eprintln!("Telemetry saved successfully");
    eprintln!("  Path: {}", telemetry.display());
    eprintln!("  Rows: {}", writer.rows());
    Ok(())
}
