//! Relative Strength Index (RSI).
//!
//! delta = close[t] - close[t-1]; gain = max(delta, 0); loss = max(-delta, 0).
//! Average gain and loss are simple rolling means over `period` (not Wilder
//! smoothing). RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Output: `RSI_{period}`. Lookback: period - 1.
//!
//! Edge cases:
//! - An undefined delta (first row, or next to a close gap) counts as zero
//!   gain and zero loss.
//! - avg_loss == 0 is replaced by `LOSS_FLOOR`, so a window of pure gains
//!   reads ~100 and a flat window reads 0.

use crate::error::ComputeError;
use crate::indicator::{require_column, Indicator};
use crate::series::{PriceSeries, CLOSE};

use super::rolling::rolling_mean;

/// Substitute for an average loss of exactly zero.
pub const LOSS_FLOOR: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("RSI_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn output_columns(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn compute(&self, series: &PriceSeries) -> Result<PriceSeries, ComputeError> {
        let close = require_column(series, &self.name, CLOSE)?;
        let n = close.len();

        let mut gains = Vec::with_capacity(n);
        let mut losses = Vec::with_capacity(n);
        for i in 0..n {
            let delta = match (i.checked_sub(1).and_then(|p| close[p]), close[i]) {
                (Some(prev), Some(curr)) => curr - prev,
                _ => 0.0,
            };
            gains.push(Some(delta.max(0.0)));
            losses.push(Some((-delta).max(0.0)));
        }

        let avg_gain = rolling_mean(&gains, self.period);
        let avg_loss = rolling_mean(&losses, self.period);

        let rsi = avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(gain, loss)| Some(compute_rsi((*gain)?, (*loss)?)))
            .collect();

        Ok(series.with_column(&self.name, rsi)?)
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    let avg_loss = if avg_loss == 0.0 { LOSS_FLOOR } else { avg_loss };
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}
