//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (span + 1).
//! Seed: EMA[0] = close[0] (no bias adjustment, no SMA seed).
//! Output: `EMA_{span}`. Lookback: 0.

use crate::error::ComputeError;
use crate::indicator::{require_column, Indicator};
use crate::series::{PriceSeries, CLOSE};

use super::rolling::ewm_mean;

#[derive(Debug, Clone, PartialEq)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("EMA_{span}"),
        }
    }

    pub fn span(&self) -> usize {
        self.span
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn output_columns(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn compute(&self, series: &PriceSeries) -> Result<PriceSeries, ComputeError> {
        let close = require_column(series, &self.name, CLOSE)?;
        let ema = ewm_mean(&close, self.span);
        Ok(series.with_column(&self.name, ema)?)
    }
}
