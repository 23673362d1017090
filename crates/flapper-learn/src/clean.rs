//! Cleaning and min-max normalization of raw telemetry.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::dataset::{FEATURE_COUNT, FEATURE_NAMES, RawRecord, Sample};

/// Observed range of one feature column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub name: String,
    pub min: f32,
    pub max: f32,
}

impl FeatureRange {
    /// Maps `value` into `[0, 1]` relative to the observed range.
    ///
    /// A constant column maps to 0. Values outside the range (seen only at
    /// play time) are clamped.
    #[must_use]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range > 0.0 {
            ((value - self.min) / range).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Min-max parameters, saved next to the cleaned dataset so live
/// observations can be scaled the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParams {
    pub features: Vec<FeatureRange>,
}

impl NormalizationParams {
    /// Computes per-column ranges. Returns `None` if `samples` is empty.
    #[must_use]
    pub fn fit(samples: &[Sample]) -> Option<Self> {
        let first = samples.first()?;
        let mut mins = first.features;
        let mut maxs = first.features;
        for sample in samples {
            for (i, &value) in sample.features.iter().enumerate() {
                mins[i] = mins[i].min(value);
                maxs[i] = maxs[i].max(value);
            }
        }
        let features = FEATURE_NAMES
            .iter()
            .zip(mins.into_iter().zip(maxs))
            .map(|(name, (min, max))| FeatureRange {
                name: (*name).to_owned(),
                min,
                max,
            })
            .collect();
        Some(Self { features })
    }

    #[must_use]
    pub fn apply(&self, features: &[f32; FEATURE_COUNT]) -> [f32; FEATURE_COUNT] {
        let mut out = *features;
        for (value, range) in out.iter_mut().zip(&self.features) {
            *value = range.normalize(*value);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanReport {
    pub input_rows: usize,
    pub dropped_invalid: usize,
    pub dropped_duplicates: usize,
    pub output_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cleaned {
    pub samples: Vec<Sample>,
    pub params: NormalizationParams,
    pub report: CleanReport,
}

/// Key for exact duplicate detection; `-0.0` and `0.0` compare equal.
fn row_key(sample: &Sample) -> ([u32; FEATURE_COUNT], u8) {
    (sample.features.map(|v| (v + 0.0).to_bits()), sample.label)
}

/// Drops incomplete rows and exact duplicates (keeping the first), then
/// min-max scales every feature into `[0, 1]`.
///
/// Returns `None` when no valid row remains. Running the result through
/// `clean` again changes nothing.
///
/// ```
/// use flapper_learn::{clean::clean, dataset::RawRecord};
///
/// let record = |y: f32, action: f32| RawRecord {
///     bird_y: Some(y),
///     bird_velocity: Some(1.0),
///     pipe_x: Some(300.0),
///     pipe_height: Some(100.0),
///     action: Some(action),
/// };
/// let raw = [record(100.0, 0.0), record(100.0, 0.0), record(300.0, 1.0), RawRecord::default()];
/// let cleaned = clean(&raw).unwrap();
/// assert_eq!(cleaned.report.dropped_invalid, 1);
/// assert_eq!(cleaned.report.dropped_duplicates, 1);
/// assert_eq!(cleaned.samples[1].features, [1.0, 0.0, 0.0, 0.0]);
/// ```
#[must_use]
pub fn clean(records: &[RawRecord]) -> Option<Cleaned> {
    let valid = records.iter().filter_map(RawRecord::to_sample).collect::<Vec<_>>();
    let dropped_invalid = records.len() - valid.len();

    let mut seen = HashSet::new();
    let unique = valid
        .into_iter()
        .filter(|sample| seen.insert(row_key(sample)))
        .collect::<Vec<_>>();

    let params = NormalizationParams::fit(&unique)?;
    // Rows a few ulps apart can round to the same scaled value.
    let mut seen = HashSet::new();
    let samples = unique
        .iter()
        .map(|sample| Sample {
            features: params.apply(&sample.features),
            label: sample.label,
        })
        .filter(|sample| seen.insert(row_key(sample)))
        .collect::<Vec<_>>();
    let dropped_duplicates = records.len() - dropped_invalid - samples.len();

    let report = CleanReport {
        input_rows: records.len(),
        dropped_invalid,
        dropped_duplicates,
        output_rows: samples.len(),
    };
    tracing::debug!(?report, "cleaned telemetry");
    Some(Cleaned {
        samples,
        params,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(values: [f32; 4], action: f32) -> RawRecord {
        RawRecord {
            bird_y: Some(values[0]),
            bird_velocity: Some(values[1]),
            pipe_x: Some(values[2]),
            pipe_height: Some(values[3]),
            action: Some(action),
        }
    }

    fn as_records(samples: &[Sample]) -> Vec<RawRecord> {
        samples
            .iter()
            .map(|s| record(s.features, f32::from(s.label)))
            .collect()
    }

    fn messy() -> Vec<RawRecord> {
        vec![
            record([350.0, -10.5, 700.0, 120.0], 1.0),
            record([339.0, -9.0, 695.0, 120.0], 0.0),
            record([339.0, -9.0, 695.0, 120.0], 0.0),
            record([401.3, 16.0, 240.0, 410.0], 0.0),
            RawRecord {
                pipe_x: None,
                ..record([1.0, 2.0, 3.0, 4.0], 1.0)
            },
            record([f32::INFINITY, 0.0, 0.0, 0.0], 0.0),
            record([120.7, 3.0, 455.0, 77.0], 1.0),
            record([0.0, -0.0, 0.0, 0.0], 1.0),
            record([0.0, 0.0, 0.0, 0.0], 1.0),
        ]
    }

    #[test]
    fn test_drops_invalid_and_duplicate_rows() {
        let cleaned = clean(&messy()).unwrap();
        assert_eq!(
            cleaned.report,
            CleanReport {
                input_rows: 9,
                dropped_invalid: 2,
                dropped_duplicates: 2,
                output_rows: 5,
            }
        );
    }

    #[test]
    fn test_features_are_in_unit_range() {
        let cleaned = clean(&messy()).unwrap();
        for sample in &cleaned.samples {
            assert!(sample.features.iter().all(|v| (0.0..=1.0).contains(v)));
        }
        let bird_y = &cleaned.params.features[0];
        assert_eq!((bird_y.name.as_str(), bird_y.min, bird_y.max), ("bird_y", 0.0, 401.3));
    }

    #[test]
    fn test_constant_column_maps_to_zero() {
        let raw = vec![
            record([1.0, 5.0, 3.0, 9.0], 0.0),
            record([2.0, 5.0, 4.0, 9.0], 1.0),
        ];
        let cleaned = clean(&raw).unwrap();
        assert!(cleaned.samples.iter().all(|s| s.features[1] == 0.0));
        assert!(cleaned.samples.iter().all(|s| s.features[3] == 0.0));
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let once = clean(&messy()).unwrap();
        let twice = clean(&as_records(&once.samples)).unwrap();
        assert_eq!(twice.samples, once.samples);
        assert_eq!(twice.report.dropped_invalid, 0);
        assert_eq!(twice.report.dropped_duplicates, 0);
    }

    #[test]
    fn test_rows_equal_after_scaling_are_merged() {
        let records = [0.0, 1000.0, 500.000_03, 500.000_06]
            .map(|y| record([y, 1.0, 2.0, 3.0], 0.0))
            .to_vec();
        let once = clean(&records).unwrap();
        assert_eq!(once.report.output_rows, 3);
        assert_eq!(once.report.dropped_duplicates, 1);

        let twice = clean(&as_records(&once.samples)).unwrap();
        assert_eq!(twice.samples, once.samples);
        assert_eq!(twice.report.dropped_duplicates, 0);
    }

    #[test]
    fn test_empty_after_cleaning() {
        assert!(clean(&[RawRecord::default()]).is_none());
    }

    #[test]
    fn test_apply_clamps_out_of_range_values() {
        let params = NormalizationParams {
            features: FEATURE_NAMES
                .iter()
                .map(|name| FeatureRange {
                    name: (*name).to_owned(),
                    min: 0.0,
                    max: 10.0,
                })
                .collect(),
        };
        assert_eq!(params.apply(&[-5.0, 5.0, 10.0, 20.0]), [0.0, 0.5, 1.0, 1.0]);
    }
}
