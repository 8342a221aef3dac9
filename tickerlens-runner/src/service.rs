//! Request orchestration.
//!
//! One request = one stock name plus one JSON parameter string. The order of
//! steps fixes which error a bad request sees first: an unknown stock is
//! reported before the parameters are even parsed.

use std::path::PathBuf;

use thiserror::Error;
use tickerlens_core::{
    build_pipeline, ignored_keys, parse_config, ConfigError, ErrorKind, OutputRow, PipelineError,
};
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::data_loader::{CsvSeriesLoader, DataError, SeriesLoader};
use crate::export::CsvFileSink;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl From<ConfigError> for ServiceError {
    fn from(e: ConfigError) -> Self {
        ServiceError::Pipeline(PipelineError::Configuration(e))
    }
}

impl ServiceError {
    /// Classification for the transport boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Data(e) => e.kind(),
            ServiceError::Pipeline(e) => e.kind(),
        }
    }
}

pub struct DataService<L: SeriesLoader> {
    loader: L,
    artifact: Option<PathBuf>,
}

impl DataService<CsvSeriesLoader> {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(CsvSeriesLoader::from_config(config))
            .with_artifact(config.artifact().map(PathBuf::from))
    }
}

impl<L: SeriesLoader> DataService<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            artifact: None,
        }
    }

    /// Write each processed table to `path`; `None` disables the artifact.
    pub fn with_artifact(mut self, path: Option<PathBuf>) -> Self {
        self.artifact = path;
        self
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Load `stock`, apply the indicators named in `params`, return rows.
    pub fn fetch(&self, stock: &str, params: &str) -> Result<Vec<OutputRow>, ServiceError> {
        let series = self.loader.load(stock)?;

        let config = parse_config(params)?;
        let ignored = ignored_keys(&config);
        if !ignored.is_empty() {
            debug!(keys = ?ignored, "ignoring unrecognized indicator keys");
        }

        let mut processor = build_pipeline(series, &config)?;
        if let Some(path) = &self.artifact {
            processor = processor.with_sink(CsvFileSink::new(path.clone()));
        }
        debug!(stock, indicators = ?processor.indicator_names(), "running pipeline");

        let table = processor.process()?;
        info!(
            stock,
            rows = table.len(),
            columns = table.columns().len(),
            "request served"
        );
        Ok(table.into_rows())
    }

    /// Stock names the loader can resolve.
    pub fn tickers(&self) -> Vec<String> {
        self.loader.available()
    }
}
