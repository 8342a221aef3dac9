//! Concrete indicator implementations.
//!
//! All six indicators implement the `Indicator` trait from `crate::indicator`.
//! Multi-output indicators (MACD, Bollinger Bands) write every helper column
//! they derive, so a chart can overlay intermediate lines as well.
//!
//! Windowed statistics share the helpers in `rolling`; a window containing a
//! null cell yields null.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod ma;
pub mod macd;
pub mod rolling;
pub mod rsi;

pub use atr::{true_range, Atr};
pub use bollinger::BollingerBands;
pub use ema::Ema;
pub use ma::MovingAverage;
pub use macd::Macd;
pub use rsi::Rsi;

/// Create a synthetic series from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for the first row),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> crate::series::PriceSeries {
    use crate::series::{PriceRow, PriceSeries};
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let rows = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceRow {
                date: base_date + chrono::Duration::days(i as i64),
                open: Some(open),
                high: Some(open.max(close) + 1.0),
                low: Some(open.min(close) - 1.0),
                close: Some(close),
                volume: Some(1000.0),
            }
        })
        .collect();
    PriceSeries::from_rows(rows).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
