//! Quick profile of a raw telemetry file before cleaning.

use std::{collections::HashSet, fmt};

use flapper_stats::summary::Summary;
use serde::{Deserialize, Serialize};

use crate::dataset::{CLASS_COUNT, FEATURE_NAMES, LABEL_NAME, RawRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Missing or non-finite values.
    pub missing: usize,
    /// Statistics of the finite values; `None` if there are none.
    pub summary: Option<Summary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub rows: usize,
    /// Rows with at least one missing value.
    pub incomplete_rows: usize,
    /// Rows identical to an earlier row.
    pub duplicate_rows: usize,
    pub columns: Vec<ColumnProfile>,
    /// Rows per action label, counting only rows with a valid label.
    pub class_counts: [usize; CLASS_COUNT],
}

fn record_key(record: &RawRecord) -> [Option<u32>; 5] {
    let [a, b, c, d] = record.features();
    [a, b, c, d, record.action].map(|v| v.map(|v| (v + 0.0).to_bits()))
}

impl DatasetProfile {
    #[must_use]
    pub fn new(records: &[RawRecord]) -> Self {
        let column = |index: usize| -> Vec<Option<f32>> {
            records
                .iter()
                .map(|r| {
                    let [a, b, c, d] = r.features();
                    [a, b, c, d, r.action][index]
                })
                .collect()
        };
        let columns = FEATURE_NAMES
            .iter()
            .chain([&LABEL_NAME])
            .enumerate()
            .map(|(index, name)| {
                let values = column(index);
                let finite = values
                    .iter()
                    .flatten()
                    .copied()
                    .filter(|v| v.is_finite())
                    .collect::<Vec<_>>();
                ColumnProfile {
                    name: (*name).to_owned(),
                    missing: values.len() - finite.len(),
                    summary: Summary::new(finite),
                }
            })
            .collect();

        let mut seen = HashSet::new();
        let duplicate_rows = records
            .iter()
            .filter(|r| !seen.insert(record_key(r)))
            .count();

        let mut class_counts = [0; CLASS_COUNT];
        for record in records {
            match record.action {
                Some(v) if v == 0.0 => class_counts[0] += 1,
                Some(v) if v == 1.0 => class_counts[1] += 1,
                _ => {}
            }
        }

        Self {
            rows: records.len(),
            incomplete_rows: records.iter().filter(|r| r.missing_count() > 0).count(),
            duplicate_rows,
            columns,
            class_counts,
        }
    }
}

impl fmt::Display for DatasetProfile {
    #[expect(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rows: {}", self.rows)?;
        writeln!(f, "incomplete rows: {}", self.incomplete_rows)?;
        writeln!(f, "duplicate rows: {}", self.duplicate_rows)?;
        writeln!(f, "columns:")?;
        for column in &self.columns {
            write!(f, "  {:<14} missing={}", column.name, column.missing)?;
            match &column.summary {
                Some(summary) => writeln!(f, " {summary}")?,
                None => writeln!(f)?,
            }
        }
        let labelled = self.class_counts.iter().sum::<usize>().max(1) as f32;
        write!(f, "class balance:")?;
        for (label, count) in self.class_counts.iter().enumerate() {
            write!(
                f,
                " {label}={count} ({:.1}%)",
                *count as f32 / labelled * 100.0
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::read_records;

    const CSV: &str = "\
bird_y,bird_velocity,pipe_x,pipe_height,action
100,1,300,150,0
100,1,300,150,0
200,,300,150,1
300,3,oops,150,1
400,4,300,150,0
";

    #[test]
    fn test_profile_counts() {
        let records = read_records(CSV.as_bytes()).unwrap();
        let profile = DatasetProfile::new(&records);
        assert_eq!(profile.rows, 5);
        assert_eq!(profile.incomplete_rows, 2);
        assert_eq!(profile.duplicate_rows, 1);
        assert_eq!(profile.class_counts, [3, 2]);
        let missing = profile
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c.missing))
            .collect::<Vec<_>>();
        assert_eq!(
            missing,
            [
                ("bird_y", 0),
                ("bird_velocity", 1),
                ("pipe_x", 1),
                ("pipe_height", 0),
                ("action", 0)
            ]
        );
        let bird_y = profile.columns[0].summary.as_ref().unwrap();
        assert_eq!(bird_y.stats.mean, 220.0);
    }

    #[test]
    fn test_display_mentions_balance() {
        let records = read_records(CSV.as_bytes()).unwrap();
        let text = DatasetProfile::new(&records).to_string();
        assert!(text.starts_with("rows: 5\n"));
        assert!(text.contains("class balance: 0=3 (60.0%) 1=2 (40.0%)"));
    }
}
