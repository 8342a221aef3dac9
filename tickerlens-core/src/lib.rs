//! TickerLens Core: price series, technical indicators, and the processing pipeline.
//!
//! This crate contains the computational heart of the service:
//! - `PriceSeries`: an ordered, date-indexed OHLCV table backed by a Polars `DataFrame`
//! - The `Indicator` capability and its six variants (MA, EMA, RSI, MACD, ATR, BB)
//! - Selection: configuration map → validated, canonically ordered `IndicatorSpec`s
//! - `Processor`: applies indicators in order and normalizes to JSON-safe rows
//! - `ArtifactSink`: optional injected capability receiving the processed table
//!
//! Nothing in this crate touches the filesystem; loading and artifact files
//! live in `tickerlens-runner`.

pub mod error;
pub mod indicator;
pub mod indicators;
pub mod pipeline;
pub mod selection;
pub mod series;

pub use error::{ComputeError, ConfigError, ErrorKind, PipelineError, SeriesError};
pub use indicator::Indicator;
pub use pipeline::{
    build_pipeline, normalize, ArtifactSink, Cell, OutputRow, ProcessedTable, Processor,
    SinkError,
};
pub use selection::{ignored_keys, parse_config, select_indicators, IndicatorSpec, IndicatorTag};
pub use series::{PriceRow, PriceSeries};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: request-scoped types can cross thread boundaries.
    ///
    /// A transport layer may run requests on a worker pool; nothing here
    /// holds thread-affine state.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PriceSeries>();
        require_sync::<PriceSeries>();
        require_send::<IndicatorSpec>();
        require_sync::<IndicatorSpec>();
        require_send::<Processor>();
        require_sync::<Processor>();
        require_send::<ProcessedTable>();
        require_sync::<ProcessedTable>();
        require_send::<OutputRow>();
        require_sync::<OutputRow>();
    }

    /// Architecture contract: `Indicator::compute` borrows its input immutably.
    ///
    /// Indicators return a new series; the signature leaves no way to mutate
    /// the caller's table.
    #[test]
    fn indicator_compute_takes_shared_reference() {
        fn _check_trait_object_builds(
            ind: &dyn Indicator,
            series: &PriceSeries,
        ) -> Result<PriceSeries, ComputeError> {
            ind.compute(series)
        }
    }
}
