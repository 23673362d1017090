use std::{
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use flapper_engine::GameConfig;
use flapper_learn::{
    clean::NormalizationParams,
    dataset::{self, RawRecord, Sample, TelemetryWriter},
    evaluate::{self, Prediction},
    search::ClassifierArtifact,
    split::PreparedSplit,
};
use flapper_neuro::config::EvolutionConfig;

use crate::model::GenomeModel;

/// Destination of a command's main output: a file, or stdout when no path is given.
#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<&Path>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::create(path),
            None => Ok(Output::Stdout {
                writer: io::stdout().lock(),
            }),
        }
    }

    pub fn create(path: &Path) -> anyhow::Result<Self> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize + ?Sized,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self)
            .with_context(|| format!("Failed to write to {}", self.display_path()))?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))?;
    Ok(value)
}

/// Reads the game config at `path`, or the defaults when no path is given.
pub fn read_game_config(path: Option<&Path>) -> anyhow::Result<GameConfig> {
    let config: GameConfig = path.map_or_else(
        || Ok(GameConfig::default()),
        |path| read_json_file("game config", path),
    )?;
    config.validate().context("Invalid game config")?;
    Ok(config)
}

pub fn read_evolution_config(path: Option<&Path>) -> anyhow::Result<EvolutionConfig> {
    let config: EvolutionConfig = path.map_or_else(
        || Ok(EvolutionConfig::default()),
        |path| read_json_file("evolution config", path),
    )?;
    config.validate().context("Invalid evolution config")?;
    Ok(config)
}

pub fn read_genome_model(path: &Path) -> anyhow::Result<GenomeModel> {
    read_json_file("genome model", path)
}

pub fn read_classifier(path: &Path) -> anyhow::Result<ClassifierArtifact> {
    read_json_file("classifier", path)
}

pub fn read_normalization(path: &Path) -> anyhow::Result<NormalizationParams> {
    read_json_file("normalization params", path)
}

pub fn read_split(path: &Path) -> anyhow::Result<PreparedSplit> {
    read_json_file("split", path)
}

pub fn read_raw_records(path: &Path) -> anyhow::Result<Vec<RawRecord>> {
    dataset::read_records_from_path(path)
        .with_context(|| format!("Failed to read telemetry CSV: {}", path.display()))
}

pub fn read_clean_samples(path: &Path) -> anyhow::Result<Vec<Sample>> {
    dataset::read_samples_from_path(path)
        .with_context(|| format!("Failed to read cleaned CSV: {}", path.display()))
}

pub fn write_clean_samples(path: &Path, samples: &[Sample]) -> anyhow::Result<()> {
    let output = Output::create(path)?;
    dataset::write_samples(output, samples)
        .with_context(|| format!("Failed to write cleaned CSV: {}", path.display()))
}

pub fn write_predictions(path: &Path, predictions: &[Prediction]) -> anyhow::Result<()> {
    let output = Output::create(path)?;
    evaluate::write_predictions(output, predictions)
        .with_context(|| format!("Failed to write results CSV: {}", path.display()))
}

pub fn open_telemetry(path: &Path) -> anyhow::Result<TelemetryWriter> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    TelemetryWriter::open(path)
        .with_context(|| format!("Failed to open telemetry CSV: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        Output::save_json(&EvolutionConfig::default(), Some(&path)).unwrap();
        let config = read_evolution_config(Some(&path)).unwrap();
        assert_eq!(config, EvolutionConfig::default());
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_json_file::<GameConfig, _>("game config", "/no/such/file.json").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Failed to open game config file: /no/such/file.json"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        std::fs::write(&path, r#"{ "tick_rate": 0 }"#).unwrap();
        assert!(read_game_config(Some(&path)).is_err());
    }

    #[test]
    fn test_csv_writers_create_directories() {
        let dir = tempfile::tempdir().unwrap();
        let samples = [Sample {
            features: [0.0, 0.5, 1.0, 0.25],
            label: 1,
        }];
        let path = dir.path().join("out").join("cleaned.csv");
        write_clean_samples(&path, &samples).unwrap();
        assert_eq!(read_clean_samples(&path).unwrap(), samples);

        let path = dir.path().join("out").join("results.csv");
        let predictions = [Prediction {
            actual: 1,
            predicted: 0,
        }];
        write_predictions(&path, &predictions).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Actual,Predicted\n1,0\n"
        );
    }
}
