use serde::{Deserialize, Serialize};

/// Precomputed `(percentile, value)` pairs.
///
/// # Examples
///
/// ```
/// use flapper_stats::percentiles::Percentiles;
///
/// let percentiles = Percentiles::new(&[1.0, 2.0, 3.0, 4.0, 5.0], &[25.0, 50.0, 75.0]);
/// assert_eq!(percentiles.get(25.0), Some(2.0));
/// assert_eq!(percentiles.get(50.0), Some(3.0));
/// assert_eq!(percentiles.get(90.0), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    values: Vec<(f32, f32)>,
}

impl Percentiles {
    /// Quartile points used by summaries.
    pub const QUARTILES: [f32; 3] = [25.0, 50.0, 75.0];

    #[must_use]
    pub fn new(values: &[f32], percentile_points: &[f32]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f32::total_cmp);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f32], percentile_points: &[f32]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );
        let values = percentile_points
            .iter()
            .map(|&p| (p, compute_percentile(sorted_values, p)))
            .collect();
        Self { values }
    }

    #[must_use]
    pub fn get(&self, percentile: f32) -> Option<f32> {
        self.values
            .iter()
            .find(|(p, _)| (p - percentile).abs() < f32::EPSILON)
            .map(|&(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.values.iter().copied()
    }
}

/// Percentile by linear interpolation between closest ranks.
///
/// The `p`-th percentile sits at fractional index `(n - 1) * p / 100`.
/// Returns `NaN` for an empty slice.
///
/// ```
/// use flapper_stats::percentiles::compute_percentile;
///
/// let values = [0.0, 10.0];
/// assert_eq!(compute_percentile(&values, 25.0), 2.5);
/// assert_eq!(compute_percentile(&values, 100.0), 10.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f32], percentile: f32) -> f32 {
    let Some(last) = sorted_values.len().checked_sub(1) else {
        return f32::NAN;
    };
    let rank = (last as f32 * percentile.clamp(0.0, 100.0) / 100.0).max(0.0);
    let lower = (rank.floor() as usize).min(last);
    let upper = (rank.ceil() as usize).min(last);
    let fraction = rank - rank.floor();
    sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * fraction
}
