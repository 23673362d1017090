use std::ops::RangeInclusive;

use rand::{Rng, seq::IndexedRandom};
use rand_distr::Normal;

use crate::{
    config::{EvolutionConfig, EvolutionConfigError},
    network::{Genome, HiddenNeuron},
    population::{Individual, Population},
    weights,
};

/// Builds the next generation from an evaluated population.
///
/// 1. The top `elite_count` individuals are copied unchanged
/// 2. Parents are picked by tournament selection
/// 3. The child takes the fitter parent's topology; genes both parents share
///    are blended with BLX-α, the rest come from the fitter parent
/// 4. Gaussian mutation perturbs each gene with probability `mutation_rate`
/// 5. A hidden neuron may be added or removed, within the hidden bounds
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    pub elite_count: usize,
    pub tournament_size: usize,
    pub weight_range: f32,
    pub initial_weight_range: f32,
    pub blx_alpha: f32,
    pub mutation_rate: f32,
    pub mutation_noise: Normal<f32>,
    pub add_neuron_rate: f32,
    pub remove_neuron_rate: f32,
    pub hidden_bounds: RangeInclusive<usize>,
}

impl PopulationEvolver {
    pub fn new(config: &EvolutionConfig) -> Result<Self, EvolutionConfigError> {
        config.validate()?;
        let mutation_noise = Normal::new(0.0, config.mutation_sigma).map_err(|_| {
            EvolutionConfigError::InvalidScale {
                name: "mutation_sigma",
                value: config.mutation_sigma,
            }
        })?;
        Ok(Self {
            elite_count: config.elite_count,
            tournament_size: config.tournament_size,
            weight_range: config.weight_range,
            initial_weight_range: config.initial_weight_range,
            blx_alpha: config.blx_alpha,
            mutation_rate: config.mutation_rate,
            mutation_noise,
            add_neuron_rate: config.add_neuron_rate,
            remove_neuron_rate: config.remove_neuron_rate,
            hidden_bounds: config.min_hidden..=config.max_hidden,
        })
    }

    /// Returns a population of the same size.
    ///
    /// # Panics
    ///
    /// Panics if `population` is not sorted by fitness, best first.
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let individuals = population.individuals();
        assert!(
            individuals.is_sorted_by(|a, b| a.fitness() >= b.fitness()),
            "population must be sorted by fitness"
        );

        let elite_count = self.elite_count.min(individuals.len());
        let mut next = individuals[..elite_count].to_vec();

        while next.len() < individuals.len() {
            let (Some(p1), Some(p2)) = (
                tournament_select(individuals, self.tournament_size, rng),
                tournament_select(individuals, self.tournament_size, rng),
            ) else {
                break;
            };
            let mut child = self.crossover(p1, p2, rng);
            weights::mutate(
                child.genes_mut(),
                &self.mutation_noise,
                self.weight_range,
                self.mutation_rate,
                rng,
            );
            self.mutate_structure(&mut child, rng);
            next.push(Individual::new(child));
        }

        let hidden_total = next
            .iter()
            .map(|individual| individual.genome().hidden_count())
            .sum::<usize>();
        tracing::debug!(
            elites = elite_count,
            offspring = next.len() - elite_count,
            hidden_total,
            "evolved population"
        );
        Population::from_individuals(next)
    }

    fn crossover<R>(&self, p1: &Individual, p2: &Individual, rng: &mut R) -> Genome
    where
        R: Rng + ?Sized,
    {
        let (fitter, other) = if p1.fitness() >= p2.fitness() {
            (p1, p2)
        } else {
            (p2, p1)
        };
        let mut child = fitter.genome().clone();
        for (gene, other_gene) in child.genes_mut().zip(other.genome().genes()) {
            *gene = weights::blend(*gene, other_gene, self.blx_alpha, self.weight_range, rng);
        }
        child
    }

    fn mutate_structure<R>(&self, genome: &mut Genome, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let count = genome.hidden_count();
        if count < *self.hidden_bounds.end() && rng.random_bool(f64::from(self.add_neuron_rate)) {
            genome.push_hidden(HiddenNeuron::random(rng, self.initial_weight_range));
        } else if count > *self.hidden_bounds.start()
            && rng.random_bool(f64::from(self.remove_neuron_rate))
        {
            let index = rng.random_range(0..count);
            genome.remove_hidden(index);
        }
    }
}

/// Picks `tournament_size` distinct individuals at random and returns the fittest.
fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> Option<&'a Individual>
where
    R: Rng + ?Sized,
{
    population
        .choose_multiple(rng, tournament_size.max(1))
        .max_by(|a, b| a.fitness().total_cmp(&b.fitness()))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    /// Assigns descending fitness so the population is in evolvable order.
    fn ranked(genomes: Vec<Genome>) -> Population {
        let count = genomes.len();
        let individuals = genomes
            .into_iter()
            .enumerate()
            .map(|(i, genome)| {
                let mut ind = Individual::new(genome);
                #[expect(clippy::cast_precision_loss)]
                let fitness = (count - i) as f32;
                ind.set_fitness(fitness);
                ind
            })
            .collect();
        Population::from_individuals(individuals)
    }

    #[test]
    fn test_evolve_keeps_size_and_elites() {
        let config = EvolutionConfig {
            population_size: 10,
            elite_count: 3,
            initial_hidden: 1,
            ..EvolutionConfig::default()
        };
        let mut rng = Pcg32::seed_from_u64(11);
        let population = Population::random(&config, &mut rng);
        let population = ranked(
            population
                .individuals()
                .iter()
                .map(|ind| ind.genome().clone())
                .collect(),
        );
        let evolver = PopulationEvolver::new(&config).unwrap();
        let next = evolver.evolve(&population, &mut rng);
        assert_eq!(next.len(), 10);
        for (a, b) in next.individuals().iter().zip(population.individuals()).take(3) {
            assert_eq!(a.genome(), b.genome());
        }
    }

    #[test]
    fn test_hidden_size_stays_within_bounds() {
        let config = EvolutionConfig {
            population_size: 16,
            min_hidden: 1,
            initial_hidden: 2,
            max_hidden: 3,
            add_neuron_rate: 0.5,
            remove_neuron_rate: 0.5,
            ..EvolutionConfig::default()
        };
        let mut rng = Pcg32::seed_from_u64(12);
        let evolver = PopulationEvolver::new(&config).unwrap();
        let mut population = Population::random(&config, &mut rng);
        for _ in 0..30 {
            population = ranked(
                population
                    .individuals()
                    .iter()
                    .map(|ind| ind.genome().clone())
                    .collect(),
            );
            population = evolver.evolve(&population, &mut rng);
            assert_eq!(population.len(), 16);
            for ind in population.individuals() {
                assert!((1..=3).contains(&ind.genome().hidden_count()));
                assert!(ind.genome().genes().all(|g| g.abs() <= config.weight_range));
            }
        }
    }

    #[test]
    fn test_child_takes_fitter_topology() {
        let config = EvolutionConfig {
            mutation_rate: 0.0,
            add_neuron_rate: 0.0,
            remove_neuron_rate: 0.0,
            blx_alpha: 0.0,
            ..EvolutionConfig::default()
        };
        let mut rng = Pcg32::seed_from_u64(13);
        let evolver = PopulationEvolver::new(&config).unwrap();
        let big = Genome::random(&mut rng, 3, 1.0);
        let small = Genome::random(&mut rng, 0, 1.0);
        let population = ranked(vec![big.clone(), small.clone()]);
        let (fitter, other) = (&population.individuals()[0], &population.individuals()[1]);

        let child = evolver.crossover(other, fitter, &mut rng);
        assert_eq!(child.hidden_count(), 3);
        // genes beyond the shared prefix are inherited untouched
        let shared = small.genes().count();
        assert!(child.genes().skip(shared).eq(big.genes().skip(shared)));
        // shared genes lie between the parents
        for ((c, a), b) in child.genes().zip(big.genes()).zip(small.genes()) {
            assert!(c >= a.min(b) && c <= a.max(b));
        }
    }

    #[test]
    #[should_panic(expected = "sorted")]
    fn test_evolve_requires_sorted_population() {
        let config = EvolutionConfig::default();
        let mut rng = Pcg32::seed_from_u64(14);
        let genomes = vec![Genome::random(&mut rng, 0, 1.0), Genome::random(&mut rng, 0, 1.0)];
        let mut population = ranked(genomes);
        population.individuals_mut().reverse();
        let evolver = PopulationEvolver::new(&config).unwrap();
        let _ = evolver.evolve(&population, &mut rng);
    }
}
