//! Processor: applies registered indicators in order, then normalizes.
//!
//! The base series is never modified: `process` works on a clone, so the
//! same processor can run repeatedly and produce identical tables.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{ConfigError, PipelineError};
use crate::indicator::Indicator;
use crate::selection::select_indicators;
use crate::series::PriceSeries;

use super::normalize::{normalize, ProcessedTable};
use super::sink::ArtifactSink;

pub struct Processor {
    base: PriceSeries,
    indicators: Vec<Box<dyn Indicator>>,
    sink: Option<Box<dyn ArtifactSink>>,
}

impl Processor {
    pub fn new(series: PriceSeries) -> Self {
        Self {
            base: series,
            indicators: Vec::new(),
            sink: None,
        }
    }

    /// Attach a sink that receives every processed table.
    pub fn with_sink(mut self, sink: impl ArtifactSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Append an indicator. Registration order is application order.
    pub fn register_indicator(&mut self, indicator: impl Indicator + 'static) -> &mut Self {
        self.indicators.push(Box::new(indicator));
        self
    }

    /// Indicator names in registration order.
    pub fn indicator_names(&self) -> Vec<&str> {
        self.indicators.iter().map(|ind| ind.name()).collect()
    }

    pub fn series(&self) -> &PriceSeries {
        &self.base
    }

    /// Run every indicator over a copy of the base series and normalize.
    ///
    /// The first failing indicator aborts the run; no partial table is
    /// returned and the sink is not called.
    pub fn process(&self) -> Result<ProcessedTable, PipelineError> {
        let mut series = self.base.clone();
        for indicator in &self.indicators {
            debug!(indicator = indicator.name(), "applying indicator");
            series = indicator.compute(&series)?;
        }

        let table = normalize(&series)?;
        debug!(
            rows = table.len(),
            columns = table.columns().len(),
            "normalized output"
        );

        if let Some(sink) = &self.sink {
            if let Err(e) = sink.write(&table) {
                warn!(error = %e, "artifact sink failed; returning rows anyway");
            }
        }

        Ok(table)
    }
}

/// Select indicators from `config` and register them on a new processor.
pub fn build_pipeline(
    series: PriceSeries,
    config: &Map<String, Value>,
) -> Result<Processor, ConfigError> {
    let specs = select_indicators(config)?;
    let mut processor = Processor::new(series);
    for spec in specs {
        processor.register_indicator(spec);
    }
    Ok(processor)
}
