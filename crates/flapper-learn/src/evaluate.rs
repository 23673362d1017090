//! Held-out evaluation of a fitted forest.

use std::{fs::File, io, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    dataset::{DatasetError, Sample},
    forest::RandomForest,
    metrics::ClassificationReport,
};

/// One row of the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "Actual")]
    pub actual: u8,
    #[serde(rename = "Predicted")]
    pub predicted: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub report: ClassificationReport,
    pub predictions: Vec<Prediction>,
}

/// `(actual, predicted)` for each sample.
#[must_use]
pub fn predictions(forest: &RandomForest, samples: &[Sample]) -> Vec<(u8, u8)> {
    samples
        .iter()
        .map(|s| (s.label, forest.predict(&s.features)))
        .collect()
}

#[must_use]
pub fn evaluate(forest: &RandomForest, samples: &[Sample]) -> Evaluation {
    let (actual, predicted): (Vec<u8>, Vec<u8>) = predictions(forest, samples).into_iter().unzip();
    let report = ClassificationReport::new(&actual, &predicted);
    let predictions = actual
        .into_iter()
        .zip(predicted)
        .map(|(actual, predicted)| Prediction { actual, predicted })
        .collect();
    Evaluation {
        report,
        predictions,
    }
}

/// Writes an `Actual,Predicted` CSV.
pub fn write_predictions<W>(writer: W, predictions: &[Prediction]) -> Result<(), DatasetError>
where
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(writer);
    for prediction in predictions {
        writer.serialize(prediction)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_predictions_to_path<P>(path: P, predictions: &[Prediction]) -> Result<(), DatasetError>
where
    P: AsRef<Path>,
{
    write_predictions(File::create(path)?, predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::ForestParams;

    #[test]
    fn test_evaluation_and_results_table() {
        let samples = (0..60u8)
            .map(|i| Sample {
                features: [f32::from(i), 0.0, 0.0, 0.0],
                label: u8::from(i >= 40),
            })
            .collect::<Vec<_>>();
        let params = ForestParams {
            n_estimators: 5,
            ..ForestParams::default()
        };
        let forest = RandomForest::fit(&samples, &params, 42).unwrap();
        let evaluation = evaluate(&forest, &samples);
        assert_eq!(evaluation.predictions.len(), 60);
        assert_eq!(evaluation.report.confusion.total(), 60);
        assert!(evaluation.report.accuracy > 0.9);

        let mut buf = vec![];
        write_predictions(&mut buf, &evaluation.predictions[..2]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Actual,Predicted\n0,0\n0,0\n");
    }
}
