use flapper_engine::EpisodeBudget;
use serde::{Deserialize, Serialize};

/// Parameters of a training run, read from a JSON file.
///
/// Missing fields take their defaults, so `{}` is a valid config.
///
/// ```
/// use flapper_neuro::config::EvolutionConfig;
///
/// let config: EvolutionConfig = serde_json::from_str(r#"{ "population_size": 20 }"#)?;
/// assert_eq!(config.population_size, 20);
/// assert_eq!(config.generations, 50);
/// config.validate()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Training stops after the first generation whose best fitness reaches this.
    pub fitness_threshold: f32,
    /// Top individuals copied unchanged into the next generation.
    pub elite_count: usize,
    pub tournament_size: usize,
    /// Initial weights are drawn from `[-initial_weight_range, initial_weight_range]`.
    pub initial_weight_range: f32,
    /// Weights are clamped to `[-weight_range, weight_range]`.
    pub weight_range: f32,
    pub blx_alpha: f32,
    /// Per-gene probability of Gaussian mutation.
    pub mutation_rate: f32,
    pub mutation_sigma: f32,
    pub add_neuron_rate: f32,
    pub remove_neuron_rate: f32,
    pub min_hidden: usize,
    pub max_hidden: usize,
    pub initial_hidden: usize,
    /// Limits for the single episode each generation is scored on.
    pub budget: EpisodeBudget,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 50,
            fitness_threshold: 100.0,
            elite_count: 2,
            tournament_size: 3,
            initial_weight_range: 1.0,
            weight_range: 30.0,
            blx_alpha: 0.5,
            mutation_rate: 0.8,
            mutation_sigma: 0.5,
            add_neuron_rate: 0.2,
            remove_neuron_rate: 0.2,
            min_hidden: 0,
            max_hidden: 8,
            initial_hidden: 0,
            budget: EpisodeBudget {
                max_ticks: None,
                max_score: Some(20),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum EvolutionConfigError {
    #[display("population size must be positive")]
    EmptyPopulation,
    #[display("elite count {elite_count} exceeds population size {population_size}")]
    TooManyElites {
        elite_count: usize,
        population_size: usize,
    },
    #[display("tournament size must be between 1 and the population size")]
    InvalidTournamentSize,
    #[display("hidden bounds must satisfy min <= initial <= max")]
    InvalidHiddenBounds,
    #[display("{name} must be a probability in [0, 1], got {value}")]
    InvalidRate { name: &'static str, value: f32 },
    #[display("{name} must be finite and non-negative, got {value}")]
    InvalidScale { name: &'static str, value: f32 },
}

impl EvolutionConfig {
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        if self.population_size == 0 {
            return Err(EvolutionConfigError::EmptyPopulation);
        }
        if self.elite_count > self.population_size {
            return Err(EvolutionConfigError::TooManyElites {
                elite_count: self.elite_count,
                population_size: self.population_size,
            });
        }
        if !(1..=self.population_size).contains(&self.tournament_size) {
            return Err(EvolutionConfigError::InvalidTournamentSize);
        }
        if !(self.min_hidden <= self.initial_hidden && self.initial_hidden <= self.max_hidden) {
            return Err(EvolutionConfigError::InvalidHiddenBounds);
        }
        for (name, value) in [
            ("mutation_rate", self.mutation_rate),
            ("add_neuron_rate", self.add_neuron_rate),
            ("remove_neuron_rate", self.remove_neuron_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EvolutionConfigError::InvalidRate { name, value });
            }
        }
        for (name, value) in [
            ("initial_weight_range", self.initial_weight_range),
            ("weight_range", self.weight_range),
            ("blx_alpha", self.blx_alpha),
            ("mutation_sigma", self.mutation_sigma),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EvolutionConfigError::InvalidScale { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(EvolutionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_round_trip() {
        let config = EvolutionConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: EvolutionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config: EvolutionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EvolutionConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = EvolutionConfig {
            elite_count: 60,
            ..EvolutionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::TooManyElites { .. })
        ));

        let config = EvolutionConfig {
            mutation_rate: 1.5,
            ..EvolutionConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(EvolutionConfigError::InvalidRate {
                name: "mutation_rate",
                value: 1.5
            })
        );

        let config = EvolutionConfig {
            initial_hidden: 9,
            ..EvolutionConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(EvolutionConfigError::InvalidHiddenBounds)
        );
    }
}
