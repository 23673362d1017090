use chrono::{DateTime, Utc};
use flapper_neuro::{network::Genome, population::Individual};
use serde::{Deserialize, Serialize};

/// The best genome of a training run, as saved by `train`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub fitness: f32,
    /// Generation (0-based) in which the genome was evaluated.
    pub generation: usize,
    pub genome: Genome,
}

impl GenomeModel {
    pub fn from_individual(name: &str, generation: usize, individual: &Individual) -> Self {
        Self {
            name: name.to_owned(),
            trained_at: Utc::now(),
            fitness: individual.fitness(),
            generation,
            genome: individual.genome().clone(),
        }
    }
}
