//! Binary classification metrics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::CLASS_COUNT;

/// Counts indexed as `[actual][predicted]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub counts: [[usize; CLASS_COUNT]; CLASS_COUNT],
}

impl ConfusionMatrix {
    /// # Panics
    ///
    /// Panics if the slices differ in length or hold a label outside `0..CLASS_COUNT`.
    #[must_use]
    pub fn new(actual: &[u8], predicted: &[u8]) -> Self {
        assert_eq!(actual.len(), predicted.len());
        let mut counts = [[0; CLASS_COUNT]; CLASS_COUNT];
        for (&a, &p) in actual.iter().zip(predicted) {
            counts[usize::from(a)][usize::from(p)] += 1;
        }
        Self { counts }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        (0..CLASS_COUNT).map(|c| self.counts[c][c]).sum()
    }

    /// Rows whose actual label is `class`.
    #[must_use]
    pub fn support(&self, class: usize) -> usize {
        self.counts[class].iter().sum()
    }

    #[must_use]
    pub fn predicted(&self, class: usize) -> usize {
        self.counts.iter().map(|row| row[class]).sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);
        for (i, row) in self.counts.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (j, count) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{count:>width$}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

/// Precision, recall and F1 for one class (or an average of classes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassScores {
    pub precision: f32,
    pub recall: f32,
    pub f1: f32,
    pub support: usize,
}

/// `num / den`, or 0 when the denominator is 0.
#[expect(clippy::cast_precision_loss)]
fn ratio(num: usize, den: usize) -> f32 {
    if den == 0 { 0.0 } else { num as f32 / den as f32 }
}

fn harmonic_mean(precision: f32, recall: f32) -> f32 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub confusion: ConfusionMatrix,
    pub accuracy: f32,
    pub classes: [ClassScores; CLASS_COUNT],
    pub macro_avg: ClassScores,
    pub weighted_avg: ClassScores,
}

impl ClassificationReport {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(actual: &[u8], predicted: &[u8]) -> Self {
        let confusion = ConfusionMatrix::new(actual, predicted);
        let total = confusion.total();
        let classes: [ClassScores; CLASS_COUNT] = std::array::from_fn(|c| {
            let precision = ratio(confusion.counts[c][c], confusion.predicted(c));
            let recall = ratio(confusion.counts[c][c], confusion.support(c));
            ClassScores {
                precision,
                recall,
                f1: harmonic_mean(precision, recall),
                support: confusion.support(c),
            }
        });

        let average = |weight: &dyn Fn(&ClassScores) -> f32| {
            let norm = classes.iter().map(weight).sum::<f32>();
            let mean = |field: fn(&ClassScores) -> f32| {
                if norm > 0.0 {
                    classes.iter().map(|s| field(s) * weight(s)).sum::<f32>() / norm
                } else {
                    0.0
                }
            };
            ClassScores {
                precision: mean(|s| s.precision),
                recall: mean(|s| s.recall),
                f1: mean(|s| s.f1),
                support: total,
            }
        };
        let macro_avg = average(&|_| 1.0);
        let weighted_avg = average(&|s| s.support as f32);

        Self {
            confusion,
            accuracy: ratio(confusion.correct(), total),
            classes,
            macro_avg,
            weighted_avg,
        }
    }

    /// F1 of the jump class, the quantity hyperparameter search maximizes.
    #[must_use]
    pub fn positive_f1(&self) -> f32 {
        self.classes[1].f1
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = |f: &mut fmt::Formatter<'_>, name: &str, s: &ClassScores| {
            writeln!(
                f,
                "{name:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                s.precision, s.recall, s.f1, s.support
            )
        };
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (class, scores) in self.classes.iter().enumerate() {
            line(f, &class.to_string(), scores)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.confusion.total()
        )?;
        line(f, "macro avg", &self.macro_avg)?;
        line(f, "weighted avg", &self.weighted_avg)
    }
}
