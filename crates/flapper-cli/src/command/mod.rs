use clap::{Parser, Subcommand};

use self::{
    clean::CleanArg,
    evaluate::EvaluateArg,
    init_config::InitConfigArg,
    inspect::InspectArg,
    pipeline::PipelineArg,
    play::{AutoPlayArg, ManualPlayArg},
    prepare::PrepareArg,
    record::RecordArg,
    train::TrainArg,
    tune::TuneArg,
};

mod clean;
mod evaluate;
mod init_config;
mod inspect;
mod pipeline;
mod play;
mod prepare;
mod record;
mod train;
mod tune;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play with the keyboard
    #[command(name = "play")]
    ManualPlay(#[clap(flatten)] ManualPlayArg),
    /// Watch a trained genome or classifier play
    #[command(name = "auto-play")]
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Evolve a network controller
    Train(#[clap(flatten)] TrainArg),
    /// Fly a trained genome without a screen and log telemetry
    Record(#[clap(flatten)] RecordArg),
    /// Write a default config file
    InitConfig(#[clap(flatten)] InitConfigArg),
    /// Profile a telemetry file
    Inspect(#[clap(flatten)] InspectArg),
    /// Drop bad rows and normalize telemetry
    Clean(#[clap(flatten)] CleanArg),
    /// Split and balance cleaned telemetry
    Prepare(#[clap(flatten)] PrepareArg),
    /// Search forest hyperparameters and save the best classifier
    Tune(#[clap(flatten)] TuneArg),
    /// Score a classifier on the held-out split
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Run clean, prepare, tune and evaluate end to end
    Pipeline(#[clap(flatten)] PipelineArg),
}

impl CommandArgs {
    /// Log level used when `RUST_LOG` is unset. Terminal UIs stay quiet.
    pub fn default_log_level(&self) -> &'static str {
        match self.mode {
            None | Some(Mode::ManualPlay(_) | Mode::AutoPlay(_)) => "warn",
            Some(_) => "info",
        }
    }
}

pub fn run(args: CommandArgs) -> anyhow::Result<()> {
    match args
        .mode
        .unwrap_or(Mode::ManualPlay(ManualPlayArg::default()))
    {
        Mode::ManualPlay(arg) => play::run_manual(&arg)?,
        Mode::AutoPlay(arg) => play::run_auto(&arg)?,
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Record(arg) => record::run(&arg)?,
        Mode::InitConfig(arg) => init_config::run(&arg)?,
        Mode::Inspect(arg) => inspect::run(&arg)?,
        Mode::Clean(arg) => clean::run(&arg)?,
        Mode::Prepare(arg) => prepare::run(&arg)?,
        Mode::Tune(arg) => tune::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Pipeline(arg) => pipeline::run(&arg)?,
    }
    Ok(())
}
