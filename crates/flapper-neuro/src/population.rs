use flapper_engine::{
    CourseSeed, Episode, EpisodeBudget, EpisodeError, EpisodeState, GameConfig, TickReport,
};
use flapper_stats::descriptive::DescriptiveStats;
use rand::Rng;

use crate::{
    config::EvolutionConfig,
    network::{Genome, NetworkController},
};

/// A genome and the fitness it earned in the last evaluated episode.
#[derive(Debug, Clone)]
pub struct Individual {
    genome: Genome,
    fitness: f32,
}

impl Individual {
    #[must_use]
    pub fn new(genome: Genome) -> Self {
        Self {
            genome,
            fitness: f32::MIN,
        }
    }

    #[must_use]
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    #[cfg(test)]
    pub(crate) fn set_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
    }
}

/// How the shared episode of one evaluation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeOutcome {
    pub score: u32,
    pub ticks: u64,
    pub state: EpisodeState,
}

#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates `config.population_size` random genomes with `config.initial_hidden` neurons.
    pub fn random<R>(config: &EvolutionConfig, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..config.population_size)
            .map(|_| {
                Individual::new(Genome::random(
                    rng,
                    config.initial_hidden,
                    config.initial_weight_range,
                ))
            })
            .collect();
        Self { individuals }
    }

    #[must_use]
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[cfg(test)]
    pub(crate) fn individuals_mut(&mut self) -> &mut [Individual] {
        &mut self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// The fittest individual. Only meaningful after [`evaluate_fitness`](Self::evaluate_fitness).
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Flies every genome in one shared episode and records its fitness.
    ///
    /// All birds start together on the course built from `seed` and are
    /// stepped sequentially until they are all dead or `budget` runs out.
    /// `on_tick` sees every tick report, e.g. to log telemetry. Afterwards
    /// individuals are sorted by fitness, best first.
    pub fn evaluate_fitness<F>(
        &mut self,
        game: &GameConfig,
        seed: CourseSeed,
        budget: EpisodeBudget,
        mut on_tick: F,
    ) -> Result<EpisodeOutcome, EpisodeError>
    where
        F: FnMut(&TickReport),
    {
        let mut episode = Episode::new(game.clone(), seed, self.individuals.len(), budget)?;
        let mut controllers = self
            .individuals
            .iter()
            .map(|ind| NetworkController::new(ind.genome.clone()))
            .collect::<Vec<_>>();

        while episode.state().is_running() {
            let report = episode.step(&mut controllers);
            on_tick(&report);
        }

        for (ind, slot) in self.individuals.iter_mut().zip(episode.slots()) {
            ind.fitness = slot.fitness();
        }
        // sort by fitness descending
        self.individuals
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        Ok(EpisodeOutcome {
            score: episode.score(),
            ticks: episode.tick(),
            state: episode.state(),
        })
    }

    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.individuals.iter().map(|ind| ind.fitness))
    }

    /// Statistics of hidden-layer sizes, to watch topology drift.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn compute_hidden_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(
            self.individuals
                .iter()
                .map(|ind| ind.genome.hidden_count() as f32),
        )
    }
}
