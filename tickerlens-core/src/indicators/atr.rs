//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR is the simple rolling mean of TR over `period` (not Wilder smoothing).
//! Output: `ATR_{period}`. Lookback: period (TR[0] has no previous close).

use crate::error::ComputeError;
use crate::indicator::{require_column, Indicator};
use crate::series::{PriceSeries, CLOSE, HIGH, LOW};

use super::rolling::rolling_mean;

#[derive(Debug, Clone, PartialEq)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("ATR_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// Compute the True Range series.
///
/// TR[0] is undefined (no previous close), as is any row whose high, low,
/// or previous close is undefined.
pub fn true_range(
    high: &[Option<f64>],
    low: &[Option<f64>],
    close: &[Option<f64>],
) -> Vec<Option<f64>> {
    (0..close.len())
        .map(|i| {
            let prev_close = close[i.checked_sub(1)?]?;
            let (h, l) = (high[i]?, low[i]?);
            Some((h - l).max((h - prev_close).abs()).max((l - prev_close).abs()))
        })
        .collect()
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn output_columns(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn compute(&self, series: &PriceSeries) -> Result<PriceSeries, ComputeError> {
        let high = require_column(series, &self.name, HIGH)?;
        let low = require_column(series, &self.name, LOW)?;
        let close = require_column(series, &self.name, CLOSE)?;

        let tr = true_range(&high, &low, &close);
        let atr = rolling_mean(&tr, self.period);
        Ok(series.with_column(&self.name, atr)?)
    }
}
