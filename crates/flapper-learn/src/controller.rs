use flapper_engine::{Action, Controller, Observation};

use crate::{clean::NormalizationParams, forest::RandomForest};

/// Flies a bird with a fitted forest.
///
/// Observations are scaled with the parameters saved by the cleaning step,
/// so the forest sees features on the same scale it was trained on.
#[derive(Debug, Clone)]
pub struct ForestController {
    forest: RandomForest,
    normalization: NormalizationParams,
}

impl ForestController {
    #[must_use]
    pub fn new(forest: RandomForest, normalization: NormalizationParams) -> Self {
        Self {
            forest,
            normalization,
        }
    }

    #[must_use]
    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }
}

impl Controller for ForestController {
    fn decide(&mut self, observation: &Observation) -> Action {
        let features = self
            .normalization
            .apply(&observation.telemetry_features());
        if self.forest.predict(&features) == Action::Jump.label() {
            Action::Jump
        } else {
            Action::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clean::FeatureRange, dataset::Sample, forest::ForestParams};

    #[test]
    fn test_jumps_when_low() {
        // jump whenever the (normalized) bird is in the lower half of the screen
        let samples = (0..100u16)
            .map(|i| {
                let y = f32::from(i) / 100.0;
                Sample {
                    features: [y, 0.5, 0.5, 0.5],
                    label: u8::from(y > 0.5),
                }
            })
            .collect::<Vec<_>>();
        let params = ForestParams {
            n_estimators: 5,
            ..ForestParams::default()
        };
        let forest = RandomForest::fit(&samples, &params, 42).unwrap();
        let normalization = NormalizationParams {
            features: ["bird_y", "bird_velocity", "pipe_x", "pipe_height"]
                .into_iter()
                .zip([(0.0, 800.0), (-10.5, 16.0), (0.0, 700.0), (50.0, 450.0)])
                .map(|(name, (min, max))| FeatureRange {
                    name: name.to_owned(),
                    min,
                    max,
                })
                .collect(),
        };
        let mut controller = ForestController::new(forest, normalization);
        let observation = |bird_y| Observation {
            bird_y,
            bird_velocity: 0.0,
            pipe_x: 300,
            gap_top: 200,
            gap_bottom: 400,
        };
        assert_eq!(controller.decide(&observation(700.0)), Action::Jump);
        assert_eq!(controller.decide(&observation(100.0)), Action::Idle);
    }
}
