use std::path::PathBuf;

use anyhow::Context as _;
use flapper_engine::{CourseSeed, PlaySession};
use flapper_learn::controller::ForestController;
use flapper_neuro::network::NetworkController;

use self::{
    app::PlayApp,
    pilot::{KeyboardController, Pilot},
};
use crate::{tui::Runtime, util};

mod app;
mod pilot;

/// Options shared by both interactive modes.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SessionArg {
    /// Game config file (JSON); defaults are used when omitted
    #[arg(long)]
    game_config: Option<PathBuf>,
    /// Course seed of the first attempt (random when omitted)
    #[arg(long)]
    seed: Option<u128>,
    /// Append the bird's telemetry to this CSV file
    #[arg(long)]
    telemetry: Option<PathBuf>,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ManualPlayArg {
    #[clap(flatten)]
    session: SessionArg,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Path to the model file: a genome model, or a classifier with `--normalization`
    model_path: PathBuf,
    /// Normalization params written by `clean`; treats the model as a classifier
    #[arg(long)]
    normalization: Option<PathBuf>,
    /// Run in turbo mode
    #[arg(long, default_value_t = false)]
    turbo: bool,
    #[clap(flatten)]
    session: SessionArg,
}

fn run_app(session: &SessionArg, pilot: Pilot, turbo: bool) -> anyhow::Result<()> {
    let SessionArg {
        game_config,
        seed,
        telemetry,
    } = session;

    let config = util::read_game_config(game_config.as_deref())?;
    let seed = seed.map_or_else(rand::random, CourseSeed::from_u128);
    let session = PlaySession::new(config, seed).context("Failed to start the game")?;
    let telemetry = telemetry.as_deref().map(util::open_telemetry).transpose()?;

    let mut app = PlayApp::new(session, pilot, telemetry).turbo(turbo);
    Runtime::new().run(&mut app)?;
    app.finish()
}

pub(crate) fn run_manual(arg: &ManualPlayArg) -> anyhow::Result<()> {
    let ManualPlayArg { session } = arg;
    run_app(session, Pilot::Keyboard(KeyboardController::default()), false)
}

pub(crate) fn run_auto(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        model_path,
        normalization,
        turbo,
        session,
    } = arg;

    let pilot = match normalization {
        Some(normalization_path) => {
            let classifier = util::read_classifier(model_path)?;
            let normalization = util::read_normalization(normalization_path)?;
            tracing::info!(name = %classifier.name, "loaded classifier");
            Pilot::Forest(ForestController::new(classifier.forest, normalization))
        }
        None => {
            let model = util::read_genome_model(model_path)?;
            tracing::info!(name = %model.name, fitness = model.fitness, "loaded genome");
            Pilot::Network(NetworkController::new(model.genome))
        }
    };
    run_app(session, pilot, *turbo)
}
