//! Look-ahead contamination tests for all six indicators.
//!
//! No value at row t may depend on price data from row t+1 or later.
//!
//! Method: compute on a truncated series (rows 0..100) and the full series
//! (rows 0..200), then assert rows 0..100 match exactly.

use chrono::NaiveDate;
use tickerlens_core::indicators::{Atr, BollingerBands, Ema, Macd, MovingAverage, Rsi};
use tickerlens_core::{Indicator, PriceRow, PriceSeries};

/// Deterministic pseudo-random walk with realistic OHLC spread.
fn make_test_rows(n: usize) -> Vec<PriceRow> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut price: f64 = 100.0;

    (0..n)
        .map(|i| {
            let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
            let change = ((seed % 200) as f64 - 100.0) * 0.05;
            price = (price + change).max(10.0);

            let open = price - 0.5;
            let close = price + 0.3;
            PriceRow {
                date: base_date + chrono::Duration::days(i as i64),
                open: Some(open),
                high: Some(open.max(close) + 2.0),
                low: Some(open.min(close) - 2.0),
                close: Some(close),
                volume: Some(1000.0 + i as f64 * 100.0),
            }
        })
        .collect()
}

fn assert_no_lookahead(indicator: &dyn Indicator, rows: &[PriceRow], truncated_len: usize) {
    let full = PriceSeries::from_rows(rows.to_vec()).unwrap();
    let truncated = PriceSeries::from_rows(rows[..truncated_len].to_vec()).unwrap();

    let full_result = indicator.compute(&full).unwrap();
    let truncated_result = indicator.compute(&truncated).unwrap();
    assert_eq!(truncated_result.len(), truncated_len, "{}", indicator.name());
    assert_eq!(full_result.len(), rows.len(), "{}", indicator.name());

    for column in indicator.output_columns() {
        let t = truncated_result.values(&column).unwrap();
        let f = full_result.values(&column).unwrap();
        for i in 0..truncated_len {
            assert_eq!(
                t[i],
                f[i],
                "{}: column {column} differs at row {i}",
                indicator.name()
            );
        }
    }
}

#[test]
fn no_indicator_looks_ahead() {
    let rows = make_test_rows(200);
    let indicators: Vec<Box<dyn Indicator>> = vec![
        Box::new(MovingAverage::new(20)),
        Box::new(Ema::new(12)),
        Box::new(Rsi::new(14)),
        Box::new(Macd::new(12, 26, 9)),
        Box::new(Atr::new(14)),
        Box::new(BollingerBands::new(20, 2.0)),
    ];

    for indicator in &indicators {
        assert_no_lookahead(indicator.as_ref(), &rows, 100);
    }
}

#[test]
fn warmup_matches_lookback() {
    let rows = make_test_rows(60);
    let series = PriceSeries::from_rows(rows).unwrap();
    let indicators: Vec<Box<dyn Indicator>> = vec![
        Box::new(MovingAverage::new(20)),
        Box::new(Ema::new(12)),
        Box::new(Rsi::new(14)),
        Box::new(Atr::new(14)),
        Box::new(BollingerBands::new(20, 2.0)),
    ];

    for indicator in &indicators {
        let result = indicator.compute(&series).unwrap();
        // The last output column is the one with the longest warm-up.
        let columns = indicator.output_columns();
        let values = result.values(columns.last().unwrap()).unwrap();
        let lookback = indicator.lookback();
        assert!(
            values[..lookback].iter().all(Option::is_none),
            "{}: value inside warm-up",
            indicator.name()
        );
        assert!(
            values[lookback..].iter().all(Option::is_some),
            "{}: null after warm-up",
            indicator.name()
        );
    }
}
