use std::io;

use clap::Parser as _;
use tracing_subscriber::EnvFilter;

use crate::command::CommandArgs;

mod command;
mod model;
mod tui;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    command::run(args)
}
