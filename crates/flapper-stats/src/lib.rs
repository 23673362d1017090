//! Summary statistics over `f32` samples.
//!
//! - [`descriptive`]: count, extrema, mean, median, dispersion
//! - [`percentiles`]: interpolated quantiles
//! - [`summary`]: both of the above for one column, as printed by `flapper inspect`
//!   and the per-generation training log
//!
//! # Example
//!
//! ```
//! use flapper_stats::summary::Summary;
//!
//! let summary = Summary::new([4.0, 1.0, 3.0, 2.0]).unwrap();
//! assert_eq!(summary.stats.count, 4);
//! assert_eq!(summary.stats.median, 2.5);
//! assert_eq!(summary.quartiles.get(50.0), Some(2.5));
//! ```

pub mod descriptive;
pub mod percentiles;
pub mod summary;
