//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Four columns, written in order:
//! - `SMA_{window}`: rolling mean of close
//! - `STD_{window}`: rolling sample standard deviation of close (divide by N-1)
//! - `Upper_BB`: SMA + num_std * STD
//! - `Lower_BB`: SMA - num_std * STD
//!
//! Lookback: window - 1 (STD, and so both bands, stay null for window 1).

use crate::error::ComputeError;
use crate::indicator::{require_column, Indicator};
use crate::series::{PriceSeries, CLOSE};

use super::rolling::{rolling_mean, rolling_std};

pub const UPPER_COLUMN: &str = "Upper_BB";
pub const LOWER_COLUMN: &str = "Lower_BB";

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    window: usize,
    num_std: f64,
    name: String,
}

impl BollingerBands {
    pub fn new(window: usize, num_std: f64) -> Self {
        assert!(window >= 1, "Bollinger window must be >= 1");
        assert!(num_std.is_finite(), "Bollinger num_std must be finite");
        Self {
            window,
            num_std,
            name: format!("BB_{window}_{num_std}"),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn num_std(&self) -> f64 {
        self.num_std
    }
}

impl Indicator for BollingerBands {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn output_columns(&self) -> Vec<String> {
        vec![
            format!("SMA_{}", self.window),
            format!("STD_{}", self.window),
            UPPER_COLUMN.to_string(),
            LOWER_COLUMN.to_string(),
        ]
    }

    fn compute(&self, series: &PriceSeries) -> Result<PriceSeries, ComputeError> {
        let close = require_column(series, &self.name, CLOSE)?;

        let sma = rolling_mean(&close, self.window);
        let std = rolling_std(&close, self.window);
        let band = |sign: f64| -> Vec<Option<f64>> {
            sma.iter()
                .zip(&std)
                .map(|(m, s)| Some((*m)? + sign * self.num_std * (*s)?))
                .collect()
        };
        let upper = band(1.0);
        let lower = band(-1.0);

        Ok(series.with_columns([
            (format!("SMA_{}", self.window), sma),
            (format!("STD_{}", self.window), std),
            (UPPER_COLUMN.to_string(), upper),
            (LOWER_COLUMN.to_string(), lower),
        ])?)
    }
}
