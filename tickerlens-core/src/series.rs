//! PriceSeries: the ordered, date-indexed price table every indicator reads.
//!
//! Backed by a Polars `DataFrame` whose first column is `Date` (Polars `Date`
//! dtype) followed by nullable `Float64` columns. Cloning is cheap: column
//! buffers are reference-counted, so an indicator that appends a column
//! shares every untouched column with its input.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

pub const DATE: &str = "Date";
pub const OPEN: &str = "Open";
pub const HIGH: &str = "High";
pub const LOW: &str = "Low";
pub const CLOSE: &str = "Close";
pub const VOLUME: &str = "Volume";

/// The canonical OHLCV columns, in table order after `Date`.
pub const PRICE_COLUMNS: [&str; 5] = [OPEN, HIGH, LOW, CLOSE, VOLUME];

/// One daily observation. Missing fields are `None` and stay null downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct PriceSeries {
    frame: DataFrame,
}

impl PriceSeries {
    /// Build a series from rows in any order. Rows are sorted by date;
    /// duplicate dates are rejected.
    pub fn from_rows(mut rows: Vec<PriceRow>) -> Result<Self, SeriesError> {
        rows.sort_by_key(|r| r.date);
        let dates = rows.iter().map(|r| r.date).collect();
        let columns = vec![
            (OPEN.to_string(), rows.iter().map(|r| r.open).collect()),
            (HIGH.to_string(), rows.iter().map(|r| r.high).collect()),
            (LOW.to_string(), rows.iter().map(|r| r.low).collect()),
            (CLOSE.to_string(), rows.iter().map(|r| r.close).collect()),
            (VOLUME.to_string(), rows.iter().map(|r| r.volume).collect()),
        ];
        Self::from_columns(dates, columns)
    }

    /// Build a series from a date index and named numeric columns.
    ///
    /// Dates must already be strictly ascending. Only the given columns are
    /// created, so a source lacking e.g. `Volume` produces a table without it.
    pub fn from_columns(
        dates: Vec<NaiveDate>,
        columns: Vec<(String, Vec<Option<f64>>)>,
    ) -> Result<Self, SeriesError> {
        for (i, pair) in dates.windows(2).enumerate() {
            let (previous, date) = (pair[0], pair[1]);
            if date == previous {
                return Err(SeriesError::DuplicateDate(date));
            }
            if date < previous {
                return Err(SeriesError::Unsorted {
                    row: i + 1,
                    date,
                    previous,
                });
            }
        }

        // NaiveDate::default() is 1970-01-01, the Polars Date epoch.
        let epoch = NaiveDate::default();
        let days: Vec<i32> = dates
            .iter()
            .map(|d| (*d - epoch).num_days() as i32)
            .collect();

        let mut frame_columns = Vec::with_capacity(columns.len() + 1);
        frame_columns.push(Column::new(DATE.into(), days).cast(&DataType::Date)?);
        for (name, values) in columns {
            if values.len() != dates.len() {
                return Err(SeriesError::LengthMismatch {
                    column: name,
                    expected: dates.len(),
                    actual: values.len(),
                });
            }
            frame_columns.push(Column::new(name.into(), values));
        }

        Ok(Self {
            frame: DataFrame::new(frame_columns)?,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Column names in table order, `Date` first.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// Read a numeric column as nullable floats. NaN cells read as `None`.
    pub fn values(&self, name: &str) -> PolarsResult<Vec<Option<f64>>> {
        let column = self.frame.column(name)?.cast(&DataType::Float64)?;
        let ca = column.f64()?;
        Ok(ca.into_iter().map(|v| v.filter(|x| !x.is_nan())).collect())
    }

    /// The date index in row order.
    pub fn dates(&self) -> PolarsResult<Vec<NaiveDate>> {
        let epoch = NaiveDate::default();
        let days = self.frame.column(DATE)?.cast(&DataType::Int32)?;
        // Dates are non-null by construction.
        Ok(days
            .i32()?
            .into_iter()
            .flatten()
            .map(|d| epoch + chrono::Duration::days(d as i64))
            .collect())
    }

    /// Return a new series with `name` set to `values`. An existing column of
    /// the same name is replaced in place; otherwise the column is appended.
    pub fn with_column(&self, name: &str, values: Vec<Option<f64>>) -> PolarsResult<Self> {
        self.with_columns([(name.to_string(), values)])
    }

    /// Like `with_column` for several columns, applied in order.
    pub fn with_columns<I>(&self, columns: I) -> PolarsResult<Self>
    where
        I: IntoIterator<Item = (String, Vec<Option<f64>>)>,
    {
        let mut frame = self.frame.clone();
        for (name, values) in columns {
            frame.with_column(Column::new(name.into(), values))?;
        }
        Ok(Self { frame })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn row(d: u32, close: f64) -> PriceRow {
        PriceRow {
            date: day(d),
            open: Some(close),
            high: Some(close + 1.0),
            low: Some(close - 1.0),
            close: Some(close),
            volume: Some(1000.0),
        }
    }

    #[test]
    fn from_rows_sorts_by_date() {
        let series = PriceSeries::from_rows(vec![row(3, 12.0), row(1, 10.0), row(2, 11.0)]).unwrap();
        assert_eq!(series.dates().unwrap(), vec![day(1), day(2), day(3)]);
        assert_eq!(
            series.values(CLOSE).unwrap(),
            vec![Some(10.0), Some(11.0), Some(12.0)]
        );
    }

    #[test]
    fn from_rows_rejects_duplicate_dates() {
        let result = PriceSeries::from_rows(vec![row(1, 10.0), row(1, 11.0)]);
        assert!(matches!(result, Err(SeriesError::DuplicateDate(d)) if d == day(1)));
    }

    #[test]
    fn from_columns_rejects_unsorted_dates() {
        let result = PriceSeries::from_columns(
            vec![day(2), day(1)],
            vec![(CLOSE.to_string(), vec![Some(1.0), Some(2.0)])],
        );
        assert!(matches!(result, Err(SeriesError::Unsorted { row: 1, .. })));
    }

    #[test]
    fn from_columns_rejects_length_mismatch() {
        let result = PriceSeries::from_columns(
            vec![day(1), day(2)],
            vec![(CLOSE.to_string(), vec![Some(1.0)])],
        );
        assert!(matches!(result, Err(SeriesError::LengthMismatch { .. })));
    }

    #[test]
    fn column_order_is_date_then_ohlcv() {
        let series = PriceSeries::from_rows(vec![row(1, 10.0)]).unwrap();
        assert_eq!(
            series.column_names(),
            vec!["Date", "Open", "High", "Low", "Close", "Volume"]
        );
    }

    #[test]
    fn gaps_read_back_as_none() {
        let mut gap = row(2, 0.0);
        gap.close = None;
        let series = PriceSeries::from_rows(vec![row(1, 10.0), gap]).unwrap();
        assert_eq!(series.values(CLOSE).unwrap(), vec![Some(10.0), None]);
    }

    #[test]
    fn with_column_leaves_input_untouched() {
        let base = PriceSeries::from_rows(vec![row(1, 10.0), row(2, 11.0)]).unwrap();
        let extended = base.with_column("X", vec![Some(1.0), None]).unwrap();

        assert!(!base.has_column("X"));
        assert!(extended.has_column("X"));
        assert_eq!(extended.values("X").unwrap(), vec![Some(1.0), None]);
    }

    #[test]
    fn with_column_replaces_existing_in_place() {
        let base = PriceSeries::from_rows(vec![row(1, 10.0)]).unwrap();
        let once = base.with_column("X", vec![Some(1.0)]).unwrap();
        let twice = once.with_column("X", vec![Some(2.0)]).unwrap();

        assert_eq!(twice.column_names(), once.column_names());
        assert_eq!(twice.values("X").unwrap(), vec![Some(2.0)]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let series = PriceSeries::from_rows(vec![row(1, 10.0)]).unwrap();
        assert!(series.values("Nope").is_err());
        assert!(!series.has_column("Nope"));
    }
}
