//! Output normalization: turns an augmented series into JSON-safe rows.
//!
//! Every row carries the date as a leading `"YYYY-MM-DD"` text cell followed
//! by one cell per column in table order. Non-finite floats become null, so
//! a serialized row never contains `NaN` or `Infinity`.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::ComputeError;
use crate::series::PriceSeries;

/// One JSON-safe value.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Null,
}

impl Cell {
    /// Wrap a float, mapping missing and non-finite values to `Null`.
    pub fn from_float(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Null,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

/// One output record: column name → cell, in column order.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    cells: Vec<(String, Cell)>,
}

impl OutputRow {
    pub fn new(cells: Vec<(String, Cell)>) -> Self {
        Self { cells }
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cell)| cell)
    }

    /// Numeric value of `column`; `None` when absent, null, or text.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Cell::as_f64)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Cell::as_str)
    }

    pub fn cells(&self) -> &[(String, Cell)] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for OutputRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, cell) in &self.cells {
            map.serialize_entry(name, cell)?;
        }
        map.end()
    }
}

/// The normalized result of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedTable {
    columns: Vec<String>,
    rows: Vec<OutputRow>,
}

impl ProcessedTable {
    /// Column names in processing order, `Date` first.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<OutputRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All numeric values of one column, top to bottom.
    pub fn numbers(&self, column: &str) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.number(column)).collect()
    }
}

/// Normalize a series into JSON-safe rows.
///
/// `Date`-typed columns render as `YYYY-MM-DD` text, string columns as text,
/// and every other column is cast to `Float64`. A column that cannot be
/// cast is a `ComputeError::Frame`.
pub fn normalize(series: &PriceSeries) -> Result<ProcessedTable, ComputeError> {
    let frame = series.frame();
    let columns: Vec<String> = frame
        .get_columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let mut cell_columns = Vec::with_capacity(columns.len());
    for column in frame.get_columns() {
        cell_columns.push(column_cells(column)?);
    }

    let rows = (0..frame.height())
        .map(|i| {
            OutputRow::new(
                columns
                    .iter()
                    .zip(&cell_columns)
                    .map(|(name, cells)| (name.clone(), cells[i].clone()))
                    .collect(),
            )
        })
        .collect();

    Ok(ProcessedTable { columns, rows })
}

fn column_cells(column: &Column) -> Result<Vec<Cell>, ComputeError> {
    let cells = match column.dtype() {
        DataType::Date => {
            let epoch = NaiveDate::default();
            let days = column.cast(&DataType::Int32)?;
            days.i32()?
                .into_iter()
                .map(|d| match d {
                    Some(d) => Cell::Text(
                        (epoch + chrono::Duration::days(d as i64))
                            .format("%Y-%m-%d")
                            .to_string(),
                    ),
                    None => Cell::Null,
                })
                .collect()
        }
        DataType::String => column
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|s| s.map_or(Cell::Null, |s| Cell::Text(s.to_string())))
            .collect(),
        _ => {
            let floats = column.cast(&DataType::Float64)?;
            floats.f64()?.into_iter().map(Cell::from_float).collect()
        }
    };
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::CLOSE;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn series(close: Vec<Option<f64>>) -> PriceSeries {
        let dates = (1..=close.len() as u32).map(day).collect();
        PriceSeries::from_columns(dates, vec![(CLOSE.to_string(), close)]).unwrap()
    }

    #[test]
    fn date_becomes_leading_text_column() {
        let table = normalize(&series(vec![Some(1.0), Some(2.0)])).unwrap();
        assert_eq!(table.columns(), &["Date".to_string(), "Close".to_string()]);
        assert_eq!(table.rows()[0].text("Date"), Some("2024-03-01"));
        assert_eq!(table.rows()[1].text("Date"), Some("2024-03-02"));
        assert_eq!(table.rows()[1].number("Close"), Some(2.0));
    }

    #[test]
    fn non_finite_values_become_null() {
        let table = normalize(&series(vec![
            Some(f64::INFINITY),
            Some(f64::NEG_INFINITY),
            Some(f64::NAN),
            None,
            Some(5.5),
        ]))
        .unwrap();
        assert_eq!(table.numbers("Close"), vec![None, None, None, None, Some(5.5)]);
        assert!(table.rows()[0].get("Close").unwrap().is_null());
    }

    #[test]
    fn row_serializes_as_ordered_object() {
        let table = normalize(&series(vec![None, Some(2.5)])).unwrap();
        let json = serde_json::to_string(table.rows()).unwrap();
        assert_eq!(
            json,
            r#"[{"Date":"2024-03-01","Close":null},{"Date":"2024-03-02","Close":2.5}]"#
        );
    }

    #[test]
    fn empty_series_yields_no_rows() {
        let table = normalize(&series(vec![])).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn integer_columns_render_as_numbers() {
        let frame = df!(
            "Date" => [0i32, 1],
            "Volume" => [100i64, 200],
        )
        .unwrap();
        let mut columns = frame.get_columns().to_vec();
        columns[0] = columns[0].cast(&DataType::Date).unwrap();
        let frame = DataFrame::new(columns).unwrap();

        let mut cells = Vec::new();
        for column in frame.get_columns() {
            cells.push(column_cells(column).unwrap());
        }
        assert_eq!(cells[0][0], Cell::Text("1970-01-01".into()));
        assert_eq!(cells[1], vec![Cell::Number(100.0), Cell::Number(200.0)]);
    }

    #[test]
    fn string_columns_render_as_text() {
        let column = Column::new("Ticker".into(), [Some("PLTR"), None]);
        assert_eq!(
            column_cells(&column).unwrap(),
            vec![Cell::Text("PLTR".into()), Cell::Null]
        );
    }
}
