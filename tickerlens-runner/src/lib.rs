//! TickerLens Runner: turns a (stock name, parameter string) request into rows.
//!
//! This crate builds on `tickerlens-core` to provide:
//! - Service configuration loaded from TOML
//! - CSV series loading with ticker-name resolution
//! - The `processed_data.csv` artifact sink
//! - `DataService`, the single request entry point used by the CLI

pub mod config;
pub mod data_loader;
pub mod export;
pub mod service;

pub use config::{ServiceConfig, ServiceConfigError};
pub use data_loader::{read_price_csv, CsvSeriesLoader, DataError, SeriesLoader};
pub use export::{export_table_csv, CsvFileSink};
pub use service::{DataService, ServiceError};
