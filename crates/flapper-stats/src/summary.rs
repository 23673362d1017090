use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{descriptive::DescriptiveStats, percentiles::Percentiles};

/// Descriptive statistics plus quartiles of one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub stats: DescriptiveStats,
    pub quartiles: Percentiles,
}

impl Summary {
    /// Returns `None` for an empty sample.
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);
        let stats = DescriptiveStats::from_sorted(&values)?;
        let quartiles = Percentiles::from_sorted(&values, &Percentiles::QUARTILES);
        Some(Self { stats, quartiles })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { stats, quartiles } = self;
        write!(
            f,
            "count={} mean={:.3} std={:.3} min={:.3}",
            stats.count, stats.mean, stats.std_dev, stats.min
        )?;
        for (p, value) in quartiles.iter() {
            write!(f, " p{p}={value:.3}")?;
        }
        write!(f, " max={:.3}", stats.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let summary = Summary::new([1.0, 2.0, 3.0]).unwrap();
        assert_eq!(
            summary.to_string(),
            "count=3 mean=2.000 std=0.816 min=1.000 p25=1.500 p50=2.000 p75=2.500 max=3.000"
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let summary = Summary::new([0.25, 4.0, 1.5, 9.75, 3.0]).unwrap();
        let json = serde_json::to_string(&summary).unwrap();
        let restored = serde_json::from_str::<Summary>(&json).unwrap();
        assert_eq!(restored, summary);
    }

    #[test]
    fn test_empty() {
        assert!(Summary::new(std::iter::empty()).is_none());
    }
}
