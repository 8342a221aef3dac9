//! Indicator trait.
//!
//! Indicators are pure functions: a price series in, the same series plus
//! derived columns out. They never mutate their input, never log, and never
//! touch the filesystem.

use crate::error::ComputeError;
use crate::series::PriceSeries;

/// A named, parameterized transformation that appends derived columns.
///
/// # Contract
/// - Output has the same rows, in the same order, as the input.
/// - Every input column is preserved unchanged.
/// - Warm-up cells (insufficient history) are null, never an error.
/// - A missing input column is `ComputeError::MissingColumn`.
/// - No value at row t depends on rows after t.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "MA_20", "MACD_12_26_9").
    fn name(&self) -> &str;

    /// Leading rows that are null on a gap-free series.
    fn lookback(&self) -> usize;

    /// Names of the columns this indicator writes, in write order.
    fn output_columns(&self) -> Vec<String>;

    /// Return a new series with this indicator's columns appended.
    fn compute(&self, series: &PriceSeries) -> Result<PriceSeries, ComputeError>;
}

/// Read a column an indicator depends on, mapping absence to `MissingColumn`.
pub(crate) fn require_column(
    series: &PriceSeries,
    indicator: &str,
    column: &str,
) -> Result<Vec<Option<f64>>, ComputeError> {
    if !series.has_column(column) {
        return Err(ComputeError::MissingColumn {
            indicator: indicator.to_string(),
            column: column.to_string(),
        });
    }
    Ok(series.values(column)?)
}
