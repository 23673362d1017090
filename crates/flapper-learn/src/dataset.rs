//! Telemetry CSV reading and writing.
//!
//! Two row shapes share the same five columns:
//!
//! - [`RawRecord`] tolerates missing or malformed fields (read as `None`), for
//!   freshly logged data that still needs cleaning
//! - [`Sample`] is a fully valid row: four finite features and a 0/1 label

use std::{
    fs::{File, OpenOptions},
    io,
    path::Path,
};

use flapper_engine::TelemetryRow;
use serde::{Deserialize, Serialize};

pub const FEATURE_COUNT: usize = 4;
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["bird_y", "bird_velocity", "pipe_x", "pipe_height"];
pub const LABEL_NAME: &str = "action";
pub const CLASS_COUNT: usize = 2;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum DatasetError {
    #[display("I/O error: {_0}")]
    Io(io::Error),
    #[display("CSV error: {_0}")]
    Csv(csv::Error),
    #[display("row {row} has a missing, non-finite or out-of-range value")]
    InvalidRow { row: usize },
}

impl From<io::Error> for DatasetError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// A telemetry row as found on disk; unparsable fields become `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(deserialize_with = "csv::invalid_option")]
    pub bird_y: Option<f32>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub bird_velocity: Option<f32>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub pipe_x: Option<f32>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub pipe_height: Option<f32>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub action: Option<f32>,
}

impl RawRecord {
    #[must_use]
    pub fn features(&self) -> [Option<f32>; FEATURE_COUNT] {
        [self.bird_y, self.bird_velocity, self.pipe_x, self.pipe_height]
    }

    /// Number of fields that are missing or not finite.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.features()
            .into_iter()
            .chain([self.action])
            .filter(|v| !v.is_some_and(f32::is_finite))
            .count()
    }

    /// Converts to a [`Sample`] if every feature is finite and the label is 0 or 1.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn to_sample(&self) -> Option<Sample> {
        let [a, b, c, d] = self.features();
        let features = [a?, b?, c?, d?];
        if !features.iter().all(|v| v.is_finite()) {
            return None;
        }
        let label = match self.action? {
            v if v == 0.0 || v == 1.0 => v as u8,
            _ => return None,
        };
        Some(Sample { features, label })
    }
}

impl From<&TelemetryRow> for RawRecord {
    #[expect(clippy::cast_precision_loss)]
    fn from(row: &TelemetryRow) -> Self {
        Self {
            bird_y: Some(row.bird_y),
            bird_velocity: Some(row.bird_velocity),
            pipe_x: Some(row.pipe_x as f32),
            pipe_height: Some(row.pipe_height as f32),
            action: Some(f32::from(row.action)),
        }
    }
}

/// A complete labelled feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub features: [f32; FEATURE_COUNT],
    pub label: u8,
}

/// Flat CSV form of a [`Sample`].
#[derive(Debug, Serialize, Deserialize)]
struct SampleRecord {
    bird_y: f32,
    bird_velocity: f32,
    pipe_x: f32,
    pipe_height: f32,
    action: u8,
}

impl From<&Sample> for SampleRecord {
    fn from(sample: &Sample) -> Self {
        let [bird_y, bird_velocity, pipe_x, pipe_height] = sample.features;
        Self {
            bird_y,
            bird_velocity,
            pipe_x,
            pipe_height,
            action: sample.label,
        }
    }
}

/// Counts samples per class label.
#[must_use]
pub fn class_counts(samples: &[Sample]) -> [usize; CLASS_COUNT] {
    let mut counts = [0; CLASS_COUNT];
    for sample in samples {
        counts[usize::from(sample.label)] += 1;
    }
    counts
}

pub fn read_records<R>(reader: R) -> Result<Vec<RawRecord>, DatasetError>
where
    R: io::Read,
{
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let records = reader.deserialize().collect::<Result<Vec<RawRecord>, _>>()?;
    Ok(records)
}

pub fn read_records_from_path<P>(path: P) -> Result<Vec<RawRecord>, DatasetError>
where
    P: AsRef<Path>,
{
    read_records(File::open(path)?)
}

/// Reads rows that must already be clean.
pub fn read_samples<R>(reader: R) -> Result<Vec<Sample>, DatasetError>
where
    R: io::Read,
{
    read_records(reader)?
        .iter()
        .enumerate()
        .map(|(row, record)| record.to_sample().ok_or(DatasetError::InvalidRow { row }))
        .collect()
}

pub fn read_samples_from_path<P>(path: P) -> Result<Vec<Sample>, DatasetError>
where
    P: AsRef<Path>,
{
    read_samples(File::open(path)?)
}

pub fn write_samples<W>(writer: W, samples: &[Sample]) -> Result<(), DatasetError>
where
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(writer);
    for sample in samples {
        writer.serialize(SampleRecord::from(sample))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_samples_to_path<P>(path: P, samples: &[Sample]) -> Result<(), DatasetError>
where
    P: AsRef<Path>,
{
    write_samples(File::create(path)?, samples)
}

/// Appends telemetry rows to a CSV file.
///
/// The header is written only when the file is new or empty, so several
/// runs can log into the same dataset.
#[derive(Debug)]
pub struct TelemetryWriter {
    writer: csv::Writer<File>,
    rows: u64,
}

impl TelemetryWriter {
    pub fn open<P>(path: P) -> Result<Self, DatasetError>
    where
        P: AsRef<Path>,
    {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let is_empty = file.metadata()?.len() == 0;
        let writer = csv::WriterBuilder::new()
            .has_headers(is_empty)
            .from_writer(file);
        Ok(Self { writer, rows: 0 })
    }

    pub fn append(&mut self, row: &TelemetryRow) -> Result<(), DatasetError> {
        self.writer.serialize(row)?;
        self.rows += 1;
        Ok(())
    }

    pub fn append_all<'a, I>(&mut self, rows: I) -> Result<(), DatasetError>
    where
        I: IntoIterator<Item = &'a TelemetryRow>,
    {
        for row in rows {
            self.append(row)?;
        }
        Ok(())
    }

    /// Rows written by this writer (not counting earlier contents of the file).
    #[must_use]
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn flush(&mut self) -> Result<(), DatasetError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn row(bird_y: f32, action: u8) -> TelemetryRow {
        TelemetryRow {
            bird_y,
            bird_velocity: -3.5,
            pipe_x: 410,
            pipe_height: 220,
            action,
        }
    }

    #[test]
    fn test_missing_and_garbage_fields_are_none() {
        let csv = "\
bird_y,bird_velocity,pipe_x,pipe_height,action
100.5,2,300,150,0
,2,300,150,1
100.5,abc,300,150,1
NaN,1,1,1,1
";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].missing_count(), 0);
        assert_eq!(records[1].bird_y, None);
        assert_eq!(records[2].bird_velocity, None);
        assert_eq!(records[3].missing_count(), 1);
        assert!(records[0].to_sample().is_some());
        assert!(records.iter().skip(1).all(|r| r.to_sample().is_none()));
    }

    #[test]
    fn test_label_must_be_binary() {
        let record = RawRecord {
            action: Some(2.0),
            ..RawRecord::from(&row(1.0, 0))
        };
        assert_eq!(record.to_sample(), None);
    }

    #[test]
    fn test_read_samples_rejects_dirty_rows() {
        let csv = "bird_y,bird_velocity,pipe_x,pipe_height,action\n1,2,3,,0\n";
        let err = read_samples(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidRow { row: 0 }));
    }

    #[test]
    fn test_samples_round_trip_through_csv() {
        let samples = vec![
            Sample {
                features: [0.125, 0.0, 1.0, 0.333_333_34],
                label: 1,
            },
            Sample {
                features: [0.5, 0.75, 0.25, 0.0],
                label: 0,
            },
        ];
        let mut buf = vec![];
        write_samples(&mut buf, &samples).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("bird_y,bird_velocity,pipe_x,pipe_height,action\n"));
        assert_eq!(read_samples(buf.as_slice()).unwrap(), samples);
    }

    #[test]
    fn test_telemetry_writer_appends_without_repeating_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.csv");

        let mut writer = TelemetryWriter::open(&path).unwrap();
        writer.append_all(&[row(10.0, 0), row(20.0, 1)]).unwrap();
        writer.flush().unwrap();
        drop(writer);

        let mut writer = TelemetryWriter::open(&path).unwrap();
        writer.append(&row(30.0, 1)).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.rows(), 1);
        drop(writer);

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("bird_y").count(), 1);
        let records = read_records_from_path(&path).unwrap();
        let ys: Vec<_> = records.iter().map(|r| r.bird_y.unwrap()).collect();
        assert_eq!(ys, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_class_counts() {
        let samples = [0, 1, 1, 0, 1].map(|label| Sample {
            features: [0.0; 4],
            label,
        });
        assert_eq!(class_counts(&samples), [2, 3]);
    }
}
