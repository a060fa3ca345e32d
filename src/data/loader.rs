//! Dataset loading from CSV
//!
//! The file holds 13 feature columns in schema order followed by a binary
//! target column. A header row is optional and, when present, is skipped
//! without being used: columns are always read by position.

use csv::{ReaderBuilder, StringRecord, Trim};
use ndarray::{Array1, Array2};
use serde::Deserialize;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use super::dataset::HeartDataset;
use crate::patient::record::{Feature, N_FEATURES};

/// Columns per row: 13 features plus the target
pub const N_COLUMNS: usize = N_FEATURES + 1;

/// Errors raised while loading the dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("dataset file '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("malformed dataset at line {line}: {reason}")]
    Malformed { line: u64, reason: String },

    #[error("failed to read dataset: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),
}

/// One data row, deserialized by position
#[derive(Debug, Deserialize)]
struct RawRow {
    age: f64,
    sex: f64,
    cp: f64,
    trestbps: f64,
    chol: f64,
    fbs: f64,
    restecg: f64,
    thalach: f64,
    exang: f64,
    oldpeak: f64,
    slope: f64,
    ca: f64,
    thal: f64,
    target: f64,
}

impl RawRow {
    fn features(&self) -> [f64; N_FEATURES] {
        [
            self.age,
            self.sex,
            self.cp,
            self.trestbps,
            self.chol,
            self.fbs,
            self.restecg,
            self.thalach,
            self.exang,
            self.oldpeak,
            self.slope,
            self.ca,
            self.thal,
        ]
    }
}

/// Name of a column by position, for error messages
fn column_name(index: usize) -> &'static str {
    Feature::ALL
        .get(index)
        .map(|f| f.code())
        .unwrap_or("target")
}

/// A header row is one where no cell is a number
///
/// A data row with a few bad cells still counts as data, so it is
/// reported as malformed instead of being skipped.
fn looks_like_header(record: &StringRecord) -> bool {
    !record.is_empty()
        && record
            .iter()
            .all(|cell| !cell.is_empty() && cell.parse::<f64>().is_err())
}

/// Data loader for the heart disease CSV file
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load the dataset from a CSV file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<HeartDataset, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DatasetError::NotFound(path.to_path_buf()),
            _ => DatasetError::Io(e),
        })?;

        info!("Loading dataset from {}", path.display());
        let dataset = Self::from_reader(file)?;

        let summary = dataset.summary();
        info!(
            "Loaded {} rows ({} healthy, {} disease)",
            summary.rows, summary.healthy, summary.disease
        );

        Ok(dataset)
    }

    /// Parse the dataset from any reader
    pub fn from_reader<R: io::Read>(reader: R) -> Result<HeartDataset, DatasetError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut features: Vec<f64> = Vec::new();
        let mut targets: Vec<f64> = Vec::new();

        for (index, result) in reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(index as u64 + 1);

            if index == 0 && looks_like_header(&record) {
                debug!("Skipping header row");
                continue;
            }

            let row = Self::parse_row(&record, line)?;
            features.extend_from_slice(&row.features());
            targets.push(row.target);
        }

        if targets.is_empty() {
            return Err(DatasetError::Malformed {
                line: 1,
                reason: "no data rows".to_string(),
            });
        }

        let n_rows = targets.len();
        let x = Array2::from_shape_vec((n_rows, N_FEATURES), features).map_err(|e| {
            DatasetError::Malformed {
                line: 1,
                reason: e.to_string(),
            }
        })?;

        Ok(HeartDataset::new(x, Array1::from_vec(targets)))
    }

    /// Check width, numeric cells and label of one record
    fn parse_row(record: &StringRecord, line: u64) -> Result<RawRow, DatasetError> {
        if record.len() != N_COLUMNS {
            return Err(DatasetError::Malformed {
                line,
                reason: format!("expected {} columns, found {}", N_COLUMNS, record.len()),
            });
        }

        let row: RawRow = record.deserialize(None).map_err(|e| {
            let column = match e.kind() {
                csv::ErrorKind::Deserialize { err, .. } => err.field(),
                _ => None,
            };
            let reason = match column {
                Some(i) => {
                    let i = i as usize;
                    format!(
                        "column '{}' is not a number: '{}'",
                        column_name(i),
                        record.get(i).unwrap_or("")
                    )
                }
                None => e.to_string(),
            };
            DatasetError::Malformed { line, reason }
        })?;

        let cells = row.features();
        if let Some(i) = cells.iter().position(|v| !v.is_finite()) {
            return Err(DatasetError::Malformed {
                line,
                reason: format!("column '{}' is not a finite number", column_name(i)),
            });
        }

        if row.target != 0.0 && row.target != 1.0 {
            return Err(DatasetError::Malformed {
                line,
                reason: format!("target must be 0 or 1, found {}", row.target),
            });
        }

        Ok(row)
    }
}
