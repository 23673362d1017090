//! Seeded train/test split and SMOTE class balancing.

use std::collections::HashMap;

use rand::{
    Rng, SeedableRng as _,
    seq::{IndexedRandom as _, SliceRandom as _},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::dataset::{CLASS_COUNT, Sample, class_counts};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_TEST_FRACTION: f32 = 0.2;
pub const DEFAULT_NEIGHBORS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SmoteError {
    #[display("training set is empty")]
    Empty,
    #[display("class {label} has no training samples to oversample from")]
    MissingClass { label: u8 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainTestSplit {
    pub train: Vec<Sample>,
    pub test: Vec<Sample>,
}

/// Shuffles with a seeded PCG generator and holds out `ceil(n * test_fraction)` samples.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn train_test_split(samples: &[Sample], test_fraction: f32, seed: u64) -> TrainTestSplit {
    let mut shuffled = samples.to_vec();
    shuffled.shuffle(&mut Pcg32::seed_from_u64(seed));
    let test_count = ((shuffled.len() as f32 * test_fraction.clamp(0.0, 1.0)).ceil() as usize)
        .min(shuffled.len());
    let train = shuffled.split_off(test_count);
    TrainTestSplit {
        train,
        test: shuffled,
    }
}

/// Oversamples minority classes until every class matches the largest one.
///
/// Each synthetic sample lies on the segment between a random minority
/// sample and one of its `k` nearest same-class neighbours (Euclidean). The
/// originals come first, followed by the synthetic samples.
pub fn smote<R>(samples: &[Sample], k: usize, rng: &mut R) -> Result<Vec<Sample>, SmoteError>
where
    R: Rng + ?Sized,
{
    if samples.is_empty() {
        return Err(SmoteError::Empty);
    }
    let counts = class_counts(samples);
    if let Some(label) = (0..CLASS_COUNT).find(|&c| counts[c] == 0) {
        return Err(SmoteError::MissingClass {
            label: u8::try_from(label).unwrap_or(u8::MAX),
        });
    }
    let target = counts.iter().copied().max().unwrap_or_default();

    let mut out = samples.to_vec();
    for (label, &count) in counts.iter().enumerate() {
        let members = samples
            .iter()
            .filter(|s| usize::from(s.label) == label)
            .collect::<Vec<_>>();
        let mut neighbors = HashMap::new();
        for _ in count..target {
            let base_index = rng.random_range(0..members.len());
            let base = members[base_index];
            let nearest = neighbors
                .entry(base_index)
                .or_insert_with(|| nearest_neighbors(&members, base_index, k));
            let synthetic = match nearest.choose(rng) {
                Some(&neighbor) => interpolate(base, members[neighbor], rng.random()),
                None => *base,
            };
            out.push(synthetic);
        }
    }
    Ok(out)
}

fn squared_distance(a: &Sample, b: &Sample) -> f32 {
    a.features
        .iter()
        .zip(&b.features)
        .map(|(x, y)| (x - y).powi(2))
        .sum()
}

fn nearest_neighbors(members: &[&Sample], index: usize, k: usize) -> Vec<usize> {
    let base = members[index];
    let mut others = (0..members.len())
        .filter(|&i| i != index)
        .map(|i| (squared_distance(base, members[i]), i))
        .collect::<Vec<_>>();
    others.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    others.into_iter().take(k).map(|(_, i)| i).collect()
}

fn interpolate(base: &Sample, neighbor: &Sample, gap: f32) -> Sample {
    let mut features = base.features;
    for (value, &other) in features.iter_mut().zip(&neighbor.features) {
        *value += gap * (other - *value);
    }
    Sample {
        features,
        label: base.label,
    }
}

/// Output of the prepare step: a held-out test set and a balanced training set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedSplit {
    pub seed: u64,
    pub test_fraction: f32,
    pub neighbors: usize,
    /// Class counts of the training set before oversampling.
    pub original_train_counts: [usize; CLASS_COUNT],
    pub train: Vec<Sample>,
    pub test: Vec<Sample>,
}

/// Splits, then balances the training half with [`smote`]. Both steps use `seed`.
pub fn prepare(
    samples: &[Sample],
    test_fraction: f32,
    seed: u64,
    neighbors: usize,
) -> Result<PreparedSplit, SmoteError> {
    let TrainTestSplit { train, test } = train_test_split(samples, test_fraction, seed);
    let original_train_counts = class_counts(&train);
    let train = smote(&train, neighbors, &mut Pcg32::seed_from_u64(seed))?;
    tracing::debug!(
        ?original_train_counts,
        balanced = train.len(),
        test = test.len(),
        "prepared split"
    );
    Ok(PreparedSplit {
        seed,
        test_fraction,
        neighbors,
        original_train_counts,
        train,
        test,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(n: usize, positives_every: usize) -> Vec<Sample> {
        (0..n)
            .map(|i| {
                #[expect(clippy::cast_precision_loss)]
                let x = i as f32 / n as f32;
                Sample {
                    features: [x, 1.0 - x, (x * 7.0).fract(), 0.5],
                    label: u8::from(i % positives_every == 0),
                }
            })
            .collect()
    }

    #[test]
    fn test_split_sizes_and_partition() {
        let data = samples(101, 4);
        let split = train_test_split(&data, 0.2, 42);
        assert_eq!(split.test.len(), 21);
        assert_eq!(split.train.len(), 80);
        let mut all: Vec<_> = split.train.iter().chain(&split.test).map(|s| s.features[0]).collect();
        all.sort_by(f32::total_cmp);
        let mut expected: Vec<_> = data.iter().map(|s| s.features[0]).collect();
        expected.sort_by(f32::total_cmp);
        assert_eq!(all, expected);
    }

    #[test]
    fn test_split_is_seeded() {
        let data = samples(50, 3);
        assert_eq!(train_test_split(&data, 0.2, 42), train_test_split(&data, 0.2, 42));
        assert_ne!(train_test_split(&data, 0.2, 42), train_test_split(&data, 0.2, 7));
    }

    #[test]
    fn test_smote_balances_classes() {
        let data = samples(200, 5);
        assert_eq!(class_counts(&data), [160, 40]);
        let balanced = smote(&data, DEFAULT_NEIGHBORS, &mut Pcg32::seed_from_u64(42)).unwrap();
        assert_eq!(class_counts(&balanced), [160, 160]);
        assert_eq!(&balanced[..200], data.as_slice());
    }

    #[test]
    fn test_synthetic_samples_lie_within_minority_hull() {
        let data = samples(200, 5);
        let minority: Vec<_> = data.iter().filter(|s| s.label == 1).collect();
        let balanced = smote(&data, 3, &mut Pcg32::seed_from_u64(1)).unwrap();
        for synthetic in &balanced[200..] {
            assert_eq!(synthetic.label, 1);
            for f in 0..4 {
                let lo = minority.iter().map(|s| s.features[f]).fold(f32::MAX, f32::min);
                let hi = minority.iter().map(|s| s.features[f]).fold(f32::MIN, f32::max);
                assert!((lo - 1e-6..=hi + 1e-6).contains(&synthetic.features[f]));
            }
        }
    }

    #[test]
    fn test_single_minority_sample_is_duplicated() {
        let mut data = samples(10, 100);
        data[3].label = 1;
        data[0].label = 0;
        let balanced = smote(&data, 5, &mut Pcg32::seed_from_u64(2)).unwrap();
        assert_eq!(class_counts(&balanced), [9, 9]);
        assert!(balanced[10..].iter().all(|s| *s == data[3]));
    }

    #[test]
    fn test_smote_requires_both_classes() {
        let data = samples(10, 100).into_iter().skip(1).collect::<Vec<_>>();
        assert_eq!(
            smote(&data, 5, &mut Pcg32::seed_from_u64(0)),
            Err(SmoteError::MissingClass { label: 1 })
        );
        assert_eq!(smote(&[], 5, &mut Pcg32::seed_from_u64(0)), Err(SmoteError::Empty));
    }

    #[test]
    fn test_prepare_is_reproducible() {
        let data = samples(300, 6);
        let a = prepare(&data, DEFAULT_TEST_FRACTION, DEFAULT_SEED, DEFAULT_NEIGHBORS).unwrap();
        let b = prepare(&data, DEFAULT_TEST_FRACTION, DEFAULT_SEED, DEFAULT_NEIGHBORS).unwrap();
        assert_eq!(a, b);
        let counts = class_counts(&a.train);
        assert_eq!(counts[0], counts[1]);
        assert_eq!(a.test.len(), 60);
    }
}
