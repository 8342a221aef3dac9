//! Integration tests for CSV series loading.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tempfile::TempDir;
use tickerlens_core::ErrorKind;
use tickerlens_runner::{read_price_csv, CsvSeriesLoader, DataError, SeriesLoader};

fn write(dir: &Path, file: &str, content: &str) {
    fs::write(dir.join(file), content).unwrap();
}

fn loader(dir: &Path) -> CsvSeriesLoader {
    let tickers: BTreeMap<String, String> =
        [("Acme".to_string(), "ACME".to_string())].into_iter().collect();
    CsvSeriesLoader::new(dir, tickers)
}

#[test]
fn loads_ohlcv_file() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "ACME_raw.csv",
        "Date,Open,High,Low,Close,Volume\n\
         2024-01-02,10,11,9,10.5,1000\n\
         2024-01-03,10.5,12,10,11.5,1200\n",
    );

    let series = loader(dir.path()).load("Acme").unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(
        series.column_names(),
        vec!["Date", "Open", "High", "Low", "Close", "Volume"]
    );
    assert_eq!(series.values("Close").unwrap(), vec![Some(10.5), Some(11.5)]);
    assert_eq!(
        series.dates().unwrap()[1],
        NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
    );
}

#[test]
fn extra_columns_dropped_and_order_normalized() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("X.csv");
    fs::write(
        &path,
        "Date,Adj Close,Close,Volume,Open\n2024-01-02,9.9,10,500,9.5\n",
    )
    .unwrap();

    let series = read_price_csv(&path).unwrap();
    assert_eq!(series.column_names(), vec!["Date", "Open", "Close", "Volume"]);
}

#[test]
fn empty_fields_become_null() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("X.csv");
    fs::write(
        &path,
        "Date,Open,High,Low,Close,Volume\n2024-01-02,10,11,9,,1000\n2024-01-03,,,,11,\n",
    )
    .unwrap();

    let series = read_price_csv(&path).unwrap();
    assert_eq!(series.values("Close").unwrap(), vec![None, Some(11.0)]);
    assert_eq!(series.values("Volume").unwrap(), vec![Some(1000.0), None]);
}

#[test]
fn rows_sorted_by_date_with_time_suffix() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("X.csv");
    fs::write(
        &path,
        "Date,Close\n2024-01-04 00:00:00,3\n2024-01-02 00:00:00,1\n2024-01-03 00:00:00,2\n",
    )
    .unwrap();

    let series = read_price_csv(&path).unwrap();
    assert_eq!(
        series.values("Close").unwrap(),
        vec![Some(1.0), Some(2.0), Some(3.0)]
    );
}

#[test]
fn duplicate_dates_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("X.csv");
    fs::write(&path, "Date,Close\n2024-01-02,1\n2024-01-02,2\n").unwrap();

    let err = read_price_csv(&path).unwrap_err();
    assert!(matches!(err, DataError::Validation(_)));
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[test]
fn bad_number_reports_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("X.csv");
    fs::write(&path, "Date,Close\n2024-01-02,1\n2024-01-03,abc\n").unwrap();

    match read_price_csv(&path).unwrap_err() {
        DataError::InvalidRow { line, message, .. } => {
            assert_eq!(line, 3);
            assert!(message.contains("Close"), "{message}");
        }
        other => panic!("expected InvalidRow, got {other:?}"),
    }
}

#[test]
fn missing_date_header_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("X.csv");
    fs::write(&path, "Day,Close\n2024-01-02,1\n").unwrap();
    assert!(matches!(
        read_price_csv(&path).unwrap_err(),
        DataError::Validation(_)
    ));
}

#[test]
fn configured_name_without_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = loader(dir.path()).load("Acme").unwrap_err();
    assert!(matches!(err, DataError::FileNotFound { .. }));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
