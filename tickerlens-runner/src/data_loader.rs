//! Series loading for the runner.
//!
//! A request names a stock by display name (e.g. `Palantir`). The loader
//! resolves it to a ticker code through the configured map and reads
//! `{data_dir}/{CODE}_raw.csv`. Resolution failures are NotFound errors and
//! happen before any file is opened.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tickerlens_core::series::PRICE_COLUMNS;
use tickerlens_core::{ErrorKind, PriceSeries, SeriesError};
use tracing::debug;

use crate::config::ServiceConfig;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unknown stock '{name}' (known: {known})")]
    UnknownTicker { name: String, known: String },

    #[error("price file {} not found", path.display())]
    FileNotFound { path: PathBuf },

    #[error("CSV error in {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("{}:{line}: {message}", path.display())]
    InvalidRow {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

impl DataError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DataError::UnknownTicker { .. } | DataError::FileNotFound { .. } => ErrorKind::NotFound,
            _ => ErrorKind::Internal,
        }
    }
}

impl From<SeriesError> for DataError {
    fn from(e: SeriesError) -> Self {
        DataError::Validation(e.to_string())
    }
}

/// Anything that can produce a price series for a stock name.
pub trait SeriesLoader: Send + Sync {
    fn load(&self, name: &str) -> Result<PriceSeries, DataError>;

    /// Names this loader can resolve, sorted.
    fn available(&self) -> Vec<String>;
}

/// Loads `{CODE}_raw.csv` files from a directory.
#[derive(Debug, Clone)]
pub struct CsvSeriesLoader {
    data_dir: PathBuf,
    tickers: BTreeMap<String, String>,
}

impl CsvSeriesLoader {
    pub fn new(data_dir: impl Into<PathBuf>, tickers: BTreeMap<String, String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            tickers,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.data_dir.clone(), config.tickers.clone())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Map a display name to its CSV path.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, DataError> {
        let code = self
            .tickers
            .get(name)
            .ok_or_else(|| DataError::UnknownTicker {
                name: name.to_string(),
                known: self.available().join(", "),
            })?;
        Ok(self.data_dir.join(format!("{code}_raw.csv")))
    }
}

impl SeriesLoader for CsvSeriesLoader {
    fn load(&self, name: &str) -> Result<PriceSeries, DataError> {
        let path = self.resolve(name)?;
        let series = read_price_csv(&path)?;
        debug!(
            stock = name,
            path = %path.display(),
            rows = series.len(),
            "loaded price series"
        );
        Ok(series)
    }

    fn available(&self) -> Vec<String> {
        self.tickers.keys().cloned().collect()
    }
}

/// Read a raw price CSV.
///
/// Requires a `Date` header. Of the remaining headers only `Open`, `High`,
/// `Low`, `Close`, and `Volume` are kept, in that order; a file without
/// `Volume` yields a series without it. Empty fields become null. Rows may
/// appear in any order but dates must be unique.
pub fn read_price_csv(path: &Path) -> Result<PriceSeries, DataError> {
    let csv_err = |source: csv::Error| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = match csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(e) => {
            if let csv::ErrorKind::Io(io) = e.kind() {
                if io.kind() == std::io::ErrorKind::NotFound {
                    return Err(DataError::FileNotFound {
                        path: path.to_path_buf(),
                    });
                }
            }
            return Err(csv_err(e));
        }
    };

    let headers = reader.headers().map_err(csv_err)?.clone();
    let date_idx = headers
        .iter()
        .position(|h| h == "Date")
        .ok_or_else(|| DataError::Validation(format!("{} has no Date column", path.display())))?;
    let value_columns: Vec<(&str, usize)> = PRICE_COLUMNS
        .iter()
        .filter_map(|name| headers.iter().position(|h| h == *name).map(|i| (*name, i)))
        .collect();

    let mut rows: Vec<(NaiveDate, Vec<Option<f64>>)> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let line = record.position().map_or(0, |p| p.line());
        let invalid = |message: String| DataError::InvalidRow {
            path: path.to_path_buf(),
            line,
            message,
        };

        let raw_date = record.get(date_idx).unwrap_or("");
        let date = parse_date(raw_date).ok_or_else(|| invalid(format!("bad date '{raw_date}'")))?;

        let mut values = Vec::with_capacity(value_columns.len());
        for (name, idx) in &value_columns {
            let field = record.get(*idx).unwrap_or("");
            values.push(
                parse_value(field).map_err(|_| invalid(format!("bad {name} value '{field}'")))?,
            );
        }
        rows.push((date, values));
    }

    rows.sort_by_key(|(date, _)| *date);
    let dates = rows.iter().map(|(date, _)| *date).collect();
    let columns = value_columns
        .iter()
        .enumerate()
        .map(|(col, (name, _))| {
            (
                name.to_string(),
                rows.iter().map(|(_, values)| values[col]).collect(),
            )
        })
        .collect();

    Ok(PriceSeries::from_columns(dates, columns)?)
}

/// Parse `YYYY-MM-DD`, ignoring any time suffix (`2024-01-02 00:00:00`,
/// `2024-01-02T00:00:00-05:00`).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10)?;
    match raw.as_bytes().get(10) {
        None | Some(b' ') | Some(b'T') => NaiveDate::parse_from_str(day, "%Y-%m-%d").ok(),
        Some(_) => None,
    }
}

fn parse_value(field: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    if field.is_empty() {
        return Ok(None);
    }
    let v: f64 = field.parse()?;
    Ok(v.is_finite().then_some(v))
}
