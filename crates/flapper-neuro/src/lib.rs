//! Neuroevolution of bird controllers.
//!
//! Each [`Individual`](population::Individual) carries a small feed-forward
//! [`Genome`](network::Genome). A generation is scored by flying every genome
//! at once in a single shared episode, so all of them face the same pipe
//! course; the fitness each bird accumulates is its score.
//!
//! # Training Loop
//!
//! ```no_run
//! use flapper_engine::GameConfig;
//! use flapper_neuro::{config::EvolutionConfig, evolver::PopulationEvolver, population::Population};
//! use rand::Rng as _;
//!
//! let config = EvolutionConfig::default();
//! let evolver = PopulationEvolver::new(&config)?;
//! let mut rng = rand::rng();
//! let mut population = Population::random(&config, &mut rng);
//! for _ in 0..config.generations {
//!     population.evaluate_fitness(&GameConfig::default(), rng.random(), config.budget, |_| {})?;
//!     if population.best().is_some_and(|best| best.fitness() >= config.fitness_threshold) {
//!         break;
//!     }
//!     population = evolver.evolve(&population, &mut rng);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! - [`network`]: genome layout, activation and [`NetworkController`](network::NetworkController)
//! - [`population`]: random initialization and shared-episode evaluation
//! - [`evolver`]: elitism, tournament selection, crossover and mutation
//! - [`weights`]: gene-level operators
//! - [`config`]: the JSON training config

pub mod config;
pub mod evolver;
pub mod network;
pub mod population;
pub mod weights;
