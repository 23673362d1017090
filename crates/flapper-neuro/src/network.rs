//! Feed-forward network genomes and the controller that flies with them.
//!
//! A [`Genome`] encodes a network with [`INPUT_COUNT`] inputs, one hidden
//! layer of variable size and a single output. Inputs also connect straight to
//! the output, so a genome with no hidden neurons is still a working
//! (linear-then-`tanh`) controller.
//!
//! ```text
//! hᵢ  = tanh(bᵢ + Σⱼ wᵢⱼ·xⱼ)
//! out = tanh(b + Σⱼ dⱼ·xⱼ + Σᵢ vᵢ·hᵢ)
//! ```
//!
//! # Gene Order
//!
//! [`Genome::genes`] flattens the weights as: direct weights, output bias,
//! then for each hidden neuron its input weights, bias and output weight.
//! Genomes of different sizes therefore share a common prefix, which is what
//! crossover aligns on.

use std::iter;

use flapper_engine::{Action, Controller, Observation};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::weights;

pub const INPUT_COUNT: usize = 3;

/// Output above this value means "jump".
pub const JUMP_THRESHOLD: f32 = 0.5;

/// Genes contributed by one hidden neuron.
pub const GENES_PER_NEURON: usize = INPUT_COUNT + 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenNeuron {
    pub input_weights: [f32; INPUT_COUNT],
    pub bias: f32,
    pub output_weight: f32,
}

impl HiddenNeuron {
    pub fn random<R>(rng: &mut R, range: f32) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            input_weights: [(); INPUT_COUNT].map(|()| weights::random_weight(rng, range)),
            bias: weights::random_weight(rng, range),
            output_weight: weights::random_weight(rng, range),
        }
    }

    fn activate(&self, inputs: &[f32; INPUT_COUNT]) -> f32 {
        let sum = iter::zip(&self.input_weights, inputs)
            .map(|(w, x)| w * x)
            .sum::<f32>();
        (self.bias + sum).tanh()
    }
}

/// # Example
///
/// ```
/// use flapper_neuro::network::Genome;
///
/// // no hidden neurons, output = tanh(1.0)
/// let genome = Genome::new(vec![], [0.0; 3], 1.0);
/// assert!(genome.activate([300.0, 10.0, 190.0]) > 0.5);
/// assert_eq!(genome.genes().count(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    hidden: Vec<HiddenNeuron>,
    direct_weights: [f32; INPUT_COUNT],
    output_bias: f32,
}

impl Genome {
    #[must_use]
    pub fn new(
        hidden: Vec<HiddenNeuron>,
        direct_weights: [f32; INPUT_COUNT],
        output_bias: f32,
    ) -> Self {
        Self {
            hidden,
            direct_weights,
            output_bias,
        }
    }

    pub fn random<R>(rng: &mut R, hidden_count: usize, range: f32) -> Self
    where
        R: Rng + ?Sized,
    {
        let direct_weights = [(); INPUT_COUNT].map(|()| weights::random_weight(rng, range));
        let output_bias = weights::random_weight(rng, range);
        let hidden = (0..hidden_count)
            .map(|_| HiddenNeuron::random(rng, range))
            .collect();
        Self {
            hidden,
            direct_weights,
            output_bias,
        }
    }

    #[must_use]
    pub fn hidden(&self) -> &[HiddenNeuron] {
        &self.hidden
    }

    #[must_use]
    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    pub(crate) fn push_hidden(&mut self, neuron: HiddenNeuron) {
        self.hidden.push(neuron);
    }

    pub(crate) fn remove_hidden(&mut self, index: usize) -> HiddenNeuron {
        self.hidden.remove(index)
    }

    /// Network output in `(-1, 1)`.
    #[must_use]
    pub fn activate(&self, inputs: [f32; INPUT_COUNT]) -> f32 {
        let direct = iter::zip(&self.direct_weights, &inputs)
            .map(|(w, x)| w * x)
            .sum::<f32>();
        let hidden = self
            .hidden
            .iter()
            .map(|neuron| neuron.output_weight * neuron.activate(&inputs))
            .sum::<f32>();
        (self.output_bias + direct + hidden).tanh()
    }

    pub fn genes(&self) -> impl Iterator<Item = f32> + '_ {
        self.direct_weights
            .iter()
            .chain(iter::once(&self.output_bias))
            .chain(self.hidden.iter().flat_map(|neuron| {
                neuron
                    .input_weights
                    .iter()
                    .chain([&neuron.bias, &neuron.output_weight])
            }))
            .copied()
    }

    pub fn genes_mut(&mut self) -> impl Iterator<Item = &mut f32> + '_ {
        self.direct_weights
            .iter_mut()
            .chain(iter::once(&mut self.output_bias))
            .chain(self.hidden.iter_mut().flat_map(|neuron| {
                neuron
                    .input_weights
                    .iter_mut()
                    .chain([&mut neuron.bias, &mut neuron.output_weight])
            }))
    }
}

/// Flies a bird with a [`Genome`].
#[derive(Debug, Clone)]
pub struct NetworkController {
    genome: Genome,
}

impl NetworkController {
    #[must_use]
    pub fn new(genome: Genome) -> Self {
        Self { genome }
    }

    #[must_use]
    pub fn genome(&self) -> &Genome {
        &self.genome
    }
}

impl Controller for NetworkController {
    fn decide(&mut self, observation: &Observation) -> Action {
        if self.genome.activate(observation.network_inputs()) > JUMP_THRESHOLD {
            Action::Jump
        } else {
            Action::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn observation() -> Observation {
        Observation {
            bird_y: 350.0,
            bird_velocity: 0.0,
            pipe_x: 500,
            gap_top: 200,
            gap_bottom: 400,
        }
    }

    #[test]
    fn test_zero_genome_idles() {
        let mut controller = NetworkController::new(Genome::new(vec![], [0.0; 3], 0.0));
        assert_eq!(controller.decide(&observation()), Action::Idle);
    }

    #[test]
    fn test_bias_alone_can_trigger_jump() {
        let mut controller = NetworkController::new(Genome::new(vec![], [0.0; 3], 2.0));
        assert_eq!(controller.decide(&observation()), Action::Jump);
    }

    #[test]
    fn test_hidden_neuron_contributes() {
        let neuron = HiddenNeuron {
            input_weights: [0.0, 0.0, 0.0],
            bias: 10.0,
            output_weight: 1.5,
        };
        let genome = Genome::new(vec![neuron], [0.0; 3], 0.0);
        let expected = (10.0f32.tanh() * 1.5).tanh();
        assert!((genome.activate([1.0, 2.0, 3.0]) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_gene_count_and_order() {
        let mut rng = Pcg32::seed_from_u64(3);
        let genome = Genome::random(&mut rng, 2, 1.0);
        assert_eq!(genome.genes().count(), INPUT_COUNT + 1 + 2 * GENES_PER_NEURON);

        let genes: Vec<_> = genome.genes().collect();
        assert_eq!(genes[INPUT_COUNT], genome.output_bias);
        assert_eq!(genes[INPUT_COUNT + 1 + INPUT_COUNT], genome.hidden[0].bias);
        assert_eq!(*genes.last().unwrap(), genome.hidden[1].output_weight);
    }

    #[test]
    fn test_genes_mut_visits_every_gene() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut genome = Genome::random(&mut rng, 3, 1.0);
        for gene in genome.genes_mut() {
            *gene = 0.5;
        }
        assert!(genome.genes().all(|g| g == 0.5));
    }

    #[test]
    fn test_serde_round_trip_keeps_behaviour() {
        let mut rng = Pcg32::seed_from_u64(5);
        let genome = Genome::random(&mut rng, 2, 1.0);
        let json = serde_json::to_string(&genome).unwrap();
        let back: Genome = serde_json::from_str(&json).unwrap();
        let inputs = observation().network_inputs();
        assert_eq!(genome.activate(inputs), back.activate(inputs));
    }
}
