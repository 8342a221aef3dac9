//! Window statistics over nullable series.
//!
//! A cell at row i is defined only when the `window` cells ending at i are
//! all defined (minimum periods = window). Sums are taken per window rather
//! than rolled forward, so results do not accumulate drift on long series.

/// Rolling arithmetic mean.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            window_at(values, i, window)?
                .iter()
                .copied()
                .sum::<Option<f64>>()
                .map(|sum| sum / window as f64)
        })
        .collect()
}

/// Rolling sample standard deviation (divides by `window - 1`).
///
/// Undefined everywhere for `window < 2`.
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            let cells = window_at(values, i, window)?
                .iter()
                .copied()
                .collect::<Option<Vec<f64>>>()?;
            let mean = cells.iter().sum::<f64>() / window as f64;
            let variance = cells
                .iter()
                .map(|v| {
                    let diff = v - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (window - 1) as f64;
            Some(variance.sqrt())
        })
        .collect()
}

/// Exponentially weighted mean with smoothing factor `alpha = 2 / (span + 1)`
/// and no bias adjustment.
///
/// Recursion: `ewm[t] = alpha * x[t] + (1 - alpha) * ewm[t-1]`, seeded with
/// the first defined value. Leading nulls stay null. A null inside the series
/// carries the previous value forward; the next defined value is blended
/// against the old value decayed once per elapsed row.
pub fn ewm_mean(values: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;

    let mut out = Vec::with_capacity(values.len());
    let mut state: Option<f64> = None;
    // Null rows seen since the last defined value.
    let mut skipped = 0;

    for &value in values {
        match (state, value) {
            (None, v) => state = v,
            (Some(prev), Some(x)) => {
                let next = if skipped == 0 {
                    alpha * x + decay * prev
                } else {
                    let old = decay.powi(skipped + 1);
                    (old * prev + alpha * x) / (old + alpha)
                };
                state = Some(next);
                skipped = 0;
            }
            (Some(_), None) => skipped += 1,
        }
        out.push(state);
    }

    out
}

/// The `window` cells ending at row `i`, or `None` during warm-up.
fn window_at(values: &[Option<f64>], i: usize, window: usize) -> Option<&[Option<f64>]> {
    if window == 0 || i + 1 < window {
        return None;
    }
    Some(&values[i + 1 - window..=i])
}
