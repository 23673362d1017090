use std::path::PathBuf;

use anyhow::Context as _;
use flapper_engine::CourseSeed;
use flapper_neuro::{
    evolver::PopulationEvolver,
    population::{Individual, Population},
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    model::GenomeModel,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Evolution config file (JSON); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Game config file (JSON); defaults are used when omitted
    #[arg(long)]
    game_config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Append every bird's telemetry to this CSV file
    #[arg(long)]
    telemetry: Option<PathBuf>,
    /// Seed for the initial population, the courses and the operators
    #[arg(long)]
    seed: Option<u64>,
    /// Name stored in the saved model
    #[arg(long, default_value = "network")]
    name: String,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        config,
        game_config,
        output,
        telemetry,
        seed,
        name,
    } = arg;

    let config = util::read_evolution_config(config.as_deref())?;
    let game = util::read_game_config(game_config.as_deref())?;
    let evolver = PopulationEvolver::new(&config)?;
    let mut telemetry = telemetry.as_deref().map(util::open_telemetry).transpose()?;

    let seed = seed.unwrap_or_else(rand::random);
    tracing::info!(seed, population = config.population_size, "training started");
    let mut rng = Pcg32::seed_from_u64(seed);

    let mut population = Population::random(&config, &mut rng);
    let mut best: Option<(usize, Individual)> = None;
    for generation in 0..config.generations {
        let course: CourseSeed = rng.random();
        let mut write_result = Ok(());
        let outcome = population.evaluate_fitness(&game, course, config.budget, |report| {
            if write_result.is_err() {
                return;
            }
            if let Some(writer) = telemetry.as_mut() {
                write_result = writer.append_all(&report.telemetry);
            }
        })?;
        write_result.context("Failed to append telemetry")?;

        let Some(champion) = population.best().cloned() else {
            break;
        };
        eprintln!(
            "Generation #{generation}: score {} in {} ticks",
            outcome.score, outcome.ticks
        );
        if let Some(stats) = population.compute_fitness_stats() {
            eprintln!("  Fitness Stats:");
            eprintln!("    Min:  {:.3}", stats.min);
            eprintln!("    Max:  {:.3}", stats.max);
            eprintln!("    Mean: {:.3}", stats.mean);
        }
        if let Some(stats) = population.compute_hidden_stats() {
            eprintln!("  Hidden Neurons:");
            eprintln!("    Min:  {:.0}", stats.min);
            eprintln!("    Max:  {:.0}", stats.max);
            eprintln!("    Mean: {:.2}", stats.mean);
        }

        let reached = champion.fitness() >= config.fitness_threshold;
        if best
            .as_ref()
            .is_none_or(|(_, b)| champion.fitness() > b.fitness())
        {
            best = Some((generation, champion));
        }
        if reached {
            tracing::info!(
                generation,
                threshold = config.fitness_threshold,
                "fitness threshold reached"
            );
            break;
        }
        if generation + 1 < config.generations {
            population = evolver.evolve(&population, &mut rng);
        }
    }

    if let Some(writer) = &mut telemetry {
        writer.flush().context("Failed to flush telemetry")?;
        eprintln!("Telemetry rows written: {}", writer.rows());
    }

    let (generation, champion) = best.context("No generation was evaluated")?;
    let model = GenomeModel::from_individual(name, generation, &champion);
    Output::save_json(&model, output.as_deref())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Generation: {}", model.generation);
    eprintln!("  Fitness: {:.3}", model.fitness);
    eprintln!("  Hidden neurons: {}", model.genome.hidden_count());

    Ok(())
}
