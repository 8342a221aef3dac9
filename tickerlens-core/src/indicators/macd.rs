//! Moving Average Convergence Divergence (MACD).
//!
//! Fast and slow EMAs of close (same recursion as `Ema`), their difference,
//! and an EMA of that difference as the signal line.
//! Outputs, in order: `MACD_EMA_{short}`, `MACD_EMA_{long}`, `MACD`, `MACD_Signal`.
//! Lookback: 0.

use crate::error::ComputeError;
use crate::indicator::{require_column, Indicator};
use crate::series::{PriceSeries, CLOSE};

use super::rolling::ewm_mean;

pub const MACD_COLUMN: &str = "MACD";
pub const SIGNAL_COLUMN: &str = "MACD_Signal";

#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    short: usize,
    long: usize,
    signal: usize,
    name: String,
}

impl Macd {
    pub fn new(short: usize, long: usize, signal: usize) -> Self {
        assert!(short >= 1, "MACD short span must be >= 1");
        assert!(long >= 1, "MACD long span must be >= 1");
        assert!(signal >= 1, "MACD signal span must be >= 1");
        Self {
            short,
            long,
            signal,
            name: format!("MACD_{short}_{long}_{signal}"),
        }
    }

    pub fn spans(&self) -> (usize, usize, usize) {
        (self.short, self.long, self.signal)
    }

    fn short_column(&self) -> String {
        format!("MACD_EMA_{}", self.short)
    }

    fn long_column(&self) -> String {
        format!("MACD_EMA_{}", self.long)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn output_columns(&self) -> Vec<String> {
        vec![
            self.short_column(),
            self.long_column(),
            MACD_COLUMN.to_string(),
            SIGNAL_COLUMN.to_string(),
        ]
    }

    fn compute(&self, series: &PriceSeries) -> Result<PriceSeries, ComputeError> {
        let close = require_column(series, &self.name, CLOSE)?;

        let fast = ewm_mean(&close, self.short);
        let slow = ewm_mean(&close, self.long);
        let macd: Vec<Option<f64>> = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();
        let signal = ewm_mean(&macd, self.signal);

        Ok(series.with_columns([
            (self.short_column(), fast),
            (self.long_column(), slow),
            (MACD_COLUMN.to_string(), macd),
            (SIGNAL_COLUMN.to_string(), signal),
        ])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_series, Ema, DEFAULT_EPSILON};

    fn closes() -> Vec<f64> {
        vec![
            22.27, 22.19, 22.08, 22.17, 22.18, 22.13, 22.23, 22.43, 22.24, 22.29, 22.15, 22.39,
        ]
    }

    #[test]
    fn macd_writes_four_columns_in_order() {
        let series = make_series(&closes());
        let result = Macd::new(3, 6, 2).compute(&series).unwrap();
        let names = result.column_names();
        let tail: Vec<&str> = names[names.len() - 4..].iter().map(|s| s.as_str()).collect();
        assert_eq!(tail, vec!["MACD_EMA_3", "MACD_EMA_6", "MACD", "MACD_Signal"]);
    }

    #[test]
    fn macd_is_fast_minus_slow_exactly() {
        let series = make_series(&closes());
        let result = Macd::new(3, 6, 2).compute(&series).unwrap();
        let fast = result.values("MACD_EMA_3").unwrap();
        let slow = result.values("MACD_EMA_6").unwrap();
        let macd = result.values("MACD").unwrap();

        for i in 0..macd.len() {
            assert_eq!(macd[i].unwrap(), fast[i].unwrap() - slow[i].unwrap());
        }
    }

    #[test]
    fn macd_helper_emas_match_standalone_ema() {
        let series = make_series(&closes());
        let macd = Macd::new(3, 6, 2).compute(&series).unwrap();
        let ema = Ema::new(3).compute(&series).unwrap();
        assert_eq!(
            macd.values("MACD_EMA_3").unwrap(),
            ema.values("EMA_3").unwrap()
        );
    }

    #[test]
    fn macd_signal_is_ema_of_macd() {
        let series = make_series(&closes());
        let result = Macd::new(3, 6, 2).compute(&series).unwrap();
        let macd = result.values("MACD").unwrap();
        let signal = result.values("MACD_Signal").unwrap();
        let alpha = 2.0 / 3.0;

        assert_eq!(signal[0], macd[0]);
        for t in 1..signal.len() {
            let expected = alpha * macd[t].unwrap() + (1.0 - alpha) * signal[t - 1].unwrap();
            assert_approx(signal[t].unwrap(), expected, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn macd_first_row_is_zero() {
        // Both EMAs seed with close[0]
        let series = make_series(&closes());
        let macd = Macd::new(12, 26, 9)
            .compute(&series)
            .unwrap()
            .values("MACD")
            .unwrap();
        assert_eq!(macd[0], Some(0.0));
    }
}
