//! Simple Moving Average (MA).
//!
//! Rolling mean of close prices over a window.
//! Output: `MA_{window}`. Lookback: window - 1.

use crate::error::ComputeError;
use crate::indicator::{require_column, Indicator};
use crate::series::{PriceSeries, CLOSE};

use super::rolling::rolling_mean;

#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverage {
    window: usize,
    name: String,
}

impl MovingAverage {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "MA window must be >= 1");
        Self {
            window,
            name: format!("MA_{window}"),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Indicator for MovingAverage {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn output_columns(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn compute(&self, series: &PriceSeries) -> Result<PriceSeries, ComputeError> {
        let close = require_column(series, &self.name, CLOSE)?;
        let ma = rolling_mean(&close, self.window);
        Ok(series.with_column(&self.name, ma)?)
    }
}
