//! Error taxonomy for the indicator pipeline.
//!
//! Three failure families reach the caller:
//! - configuration problems, detected before any computation
//! - computation problems, raised by the indicator that hit them
//! - series construction problems, raised when raw rows break the ordering invariant
//!
//! `ErrorKind` is the coarse classification a transport layer maps to
//! caller-visible responses.

use chrono::NaiveDate;
use polars::prelude::PolarsError;
use thiserror::Error;

use crate::selection::IndicatorTag;

/// Coarse error classification for the transport boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unknown ticker or missing backing data. Client-visible, not retried.
    NotFound,
    /// Unusable indicator parameters. Client-visible.
    Configuration,
    /// A required column was missing, or the table engine failed.
    Computation,
    /// Anything else (unreadable files, corrupt rows).
    Internal,
}

/// Invalid indicator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed indicator configuration: {0}")]
    Malformed(String),

    #[error("{tag}: missing required parameter '{param}'")]
    MissingParameter { tag: IndicatorTag, param: String },

    #[error("{tag}: invalid value for '{param}': {reason}")]
    InvalidParameter {
        tag: IndicatorTag,
        param: String,
        reason: String,
    },

    #[error("{tag}: unknown parameter '{param}'")]
    UnknownParameter { tag: IndicatorTag, param: String },
}

/// Failure while an indicator or the normalizer reads or extends a series.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("{indicator}: missing required column '{column}'")]
    MissingColumn { indicator: String, column: String },

    #[error("table error: {0}")]
    Frame(#[from] PolarsError),
}

/// Failure while building a `PriceSeries` from raw rows or columns.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("duplicate date {0}")]
    DuplicateDate(NaiveDate),

    #[error("dates not ascending at row {row}: {date} follows {previous}")]
    Unsorted {
        row: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },

    #[error("column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("table error: {0}")]
    Frame(#[from] PolarsError),
}

/// Everything `Processor::process` and `build_pipeline` can fail with.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("computation error: {0}")]
    Computation(#[from] ComputeError),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Configuration(_) => ErrorKind::Configuration,
            PipelineError::Computation(_) => ErrorKind::Computation,
        }
    }
}
