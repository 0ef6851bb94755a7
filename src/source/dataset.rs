//! Statistics derived by scanning a newline-delimited molecule dataset

use crate::io::error::{Result, StatsError, derivation_error};
use crate::model::bundle::RawStatistics;
use crate::source::StatsSource;
use std::path::{Path, PathBuf};

/// Estimates raw statistics from molecule encodings by frequency counting
pub trait StatsCalculator {
    /// Derive the raw statistics from `records`
    ///
    /// # Errors
    ///
    /// Returns `StatisticsDerivation` if the records cannot support estimates
    fn calculate(&self, records: &[String]) -> Result<RawStatistics>;
}

/// Split dataset text into records
///
/// One molecule per line; only the first whitespace-separated token counts,
/// so `SMILES name` lines work unchanged. Blank lines are skipped.
pub fn parse_records(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Read every record of the dataset at `path`
///
/// Lines that are not valid UTF-8 are skipped with a warning, the rest of
/// the file is still read.
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be read and `StatisticsDerivation`
/// if it holds no records
pub fn read_records(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|source| StatsError::FileSystem {
        path: path.to_path_buf(),
        operation: "read dataset",
        source,
    })?;

    let mut records = Vec::new();
    for (index, line) in bytes.split(|&byte| byte == b'\n').enumerate() {
        match std::str::from_utf8(line) {
            Ok(text) => records.extend(parse_records(text)),
            Err(error) => tracing::warn!(
                dataset = %path.display(),
                line = index + 1,
                %error,
                "Skipping line that is not valid UTF-8"
            ),
        }
    }

    if records.is_empty() {
        return Err(derivation_error(&format!(
            "dataset '{}' contains no records",
            path.display()
        )));
    }

    Ok(records)
}

/// Statistics source that runs a [`StatsCalculator`] over a dataset file
pub struct DatasetStatsSource<C> {
    path: PathBuf,
    calculator: C,
}

impl<C: StatsCalculator> DatasetStatsSource<C> {
    /// Source over the dataset at `path`
    pub fn new(path: impl Into<PathBuf>, calculator: C) -> Self {
        Self {
            path: path.into(),
            calculator,
        }
    }

    /// Dataset location
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<C: StatsCalculator> StatsSource for DatasetStatsSource<C> {
    fn load(&self) -> Result<RawStatistics> {
        let records = read_records(&self.path)?;
        tracing::info!(
            dataset = %self.path.display(),
            records = records.len(),
            "Deriving statistics from dataset"
        );

        self.calculator
            .calculate(&records)
            .map_err(|error| match error {
                StatsError::StatisticsDerivation { .. } => error,
                other => derivation_error(&other),
            })
    }

    fn describe(&self) -> String {
        format!("dataset at {}", self.path.display())
    }
}
