//! Selection: converts a JSON configuration map into validated indicator specs.
//!
//! A request names indicators by tag key (`"MA"`, `"EMA"`, ...) and gives each
//! a parameter bundle. `select_indicators` walks the tags in canonical order,
//! validates every bundle up front, and returns one `IndicatorSpec` per
//! recognized key. Keys that are not tags are skipped; `ignored_keys` lists
//! them so the caller can log what was dropped.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{ComputeError, ConfigError};
use crate::indicator::Indicator;
use crate::indicators::{Atr, BollingerBands, Ema, Macd, MovingAverage, Rsi};
use crate::series::PriceSeries;

// ─── Tags ────────────────────────────────────────────────────────────

/// The closed set of indicator families a request can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorTag {
    Ma,
    Ema,
    Rsi,
    Macd,
    Atr,
    Bb,
}

impl IndicatorTag {
    /// Canonical application order.
    pub const ALL: [IndicatorTag; 6] = [
        IndicatorTag::Ma,
        IndicatorTag::Ema,
        IndicatorTag::Rsi,
        IndicatorTag::Macd,
        IndicatorTag::Atr,
        IndicatorTag::Bb,
    ];

    /// Configuration key for this tag.
    pub fn key(self) -> &'static str {
        match self {
            IndicatorTag::Ma => "MA",
            IndicatorTag::Ema => "EMA",
            IndicatorTag::Rsi => "RSI",
            IndicatorTag::Macd => "MACD",
            IndicatorTag::Atr => "ATR",
            IndicatorTag::Bb => "BB",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.key() == key)
    }

    /// Parameter name accepted by the single-parameter tags, both as the
    /// object key and in error messages for the integer shorthand.
    fn scalar_param(self) -> Option<&'static str> {
        match self {
            IndicatorTag::Ma => Some("window"),
            IndicatorTag::Ema => Some("span"),
            IndicatorTag::Rsi | IndicatorTag::Atr => Some("period"),
            IndicatorTag::Macd | IndicatorTag::Bb => None,
        }
    }
}

impl fmt::Display for IndicatorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ─── Specs ───────────────────────────────────────────────────────────

/// A validated indicator: one variant per tag, each wrapping the concrete
/// indicator with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorSpec {
    Ma(MovingAverage),
    Ema(Ema),
    Rsi(Rsi),
    Macd(Macd),
    Atr(Atr),
    Bb(BollingerBands),
}

impl IndicatorSpec {
    /// Validate one parameter bundle for `tag`.
    pub fn from_config(tag: IndicatorTag, value: &Value) -> Result<Self, ConfigError> {
        if let Some(param) = tag.scalar_param() {
            let n = scalar_or_object(tag, param, value)?;
            return Ok(match tag {
                IndicatorTag::Ma => IndicatorSpec::Ma(MovingAverage::new(n)),
                IndicatorTag::Ema => IndicatorSpec::Ema(Ema::new(n)),
                IndicatorTag::Rsi => IndicatorSpec::Rsi(Rsi::new(n)),
                _ => IndicatorSpec::Atr(Atr::new(n)),
            });
        }

        match tag {
            IndicatorTag::Macd => {
                let params = object(tag, value, &["short", "long", "signal"])?;
                let short = positive_int(tag, "short", required(tag, params, "short")?)?;
                let long = positive_int(tag, "long", required(tag, params, "long")?)?;
                let signal = positive_int(tag, "signal", required(tag, params, "signal")?)?;
                Ok(IndicatorSpec::Macd(Macd::new(short, long, signal)))
            }
            _ => {
                let params = object(tag, value, &["window", "num_std"])?;
                let window = positive_int(tag, "window", required(tag, params, "window")?)?;
                let num_std = finite_number(tag, "num_std", required(tag, params, "num_std")?)?;
                Ok(IndicatorSpec::Bb(BollingerBands::new(window, num_std)))
            }
        }
    }

    pub fn tag(&self) -> IndicatorTag {
        match self {
            IndicatorSpec::Ma(_) => IndicatorTag::Ma,
            IndicatorSpec::Ema(_) => IndicatorTag::Ema,
            IndicatorSpec::Rsi(_) => IndicatorTag::Rsi,
            IndicatorSpec::Macd(_) => IndicatorTag::Macd,
            IndicatorSpec::Atr(_) => IndicatorTag::Atr,
            IndicatorSpec::Bb(_) => IndicatorTag::Bb,
        }
    }

    fn inner(&self) -> &dyn Indicator {
        match self {
            IndicatorSpec::Ma(ind) => ind,
            IndicatorSpec::Ema(ind) => ind,
            IndicatorSpec::Rsi(ind) => ind,
            IndicatorSpec::Macd(ind) => ind,
            IndicatorSpec::Atr(ind) => ind,
            IndicatorSpec::Bb(ind) => ind,
        }
    }
}

impl Indicator for IndicatorSpec {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn lookback(&self) -> usize {
        self.inner().lookback()
    }

    fn output_columns(&self) -> Vec<String> {
        self.inner().output_columns()
    }

    fn compute(&self, series: &PriceSeries) -> Result<PriceSeries, ComputeError> {
        self.inner().compute(series)
    }
}

// ─── Selection ───────────────────────────────────────────────────────

/// Translate a configuration map into specs, in canonical tag order.
///
/// Fails on the first invalid bundle; nothing is computed until every
/// recognized key has validated.
pub fn select_indicators(config: &Map<String, Value>) -> Result<Vec<IndicatorSpec>, ConfigError> {
    IndicatorTag::ALL
        .into_iter()
        .filter_map(|tag| config.get(tag.key()).map(|value| (tag, value)))
        .map(|(tag, value)| IndicatorSpec::from_config(tag, value))
        .collect()
}

/// Top-level keys `select_indicators` skips because they name no tag.
pub fn ignored_keys(config: &Map<String, Value>) -> Vec<&str> {
    config
        .keys()
        .map(String::as_str)
        .filter(|key| IndicatorTag::from_key(key).is_none())
        .collect()
}

/// Parse the raw request parameter string. Blank input means "no indicators".
pub fn parse_config(text: &str) -> Result<Map<String, Value>, ConfigError> {
    if text.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ConfigError::Malformed(format!(
            "expected a JSON object, got {}",
            json_type(&other)
        ))),
        Err(e) => Err(ConfigError::Malformed(e.to_string())),
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────

fn scalar_or_object(tag: IndicatorTag, param: &str, value: &Value) -> Result<usize, ConfigError> {
    match value {
        Value::Object(_) => {
            let params = object(tag, value, &[param])?;
            positive_int(tag, param, required(tag, params, param)?)
        }
        other => positive_int(tag, param, other),
    }
}

fn object<'a>(
    tag: IndicatorTag,
    value: &'a Value,
    allowed: &[&str],
) -> Result<&'a Map<String, Value>, ConfigError> {
    let Value::Object(params) = value else {
        return Err(ConfigError::Malformed(format!(
            "{tag}: expected an object with keys {}, got {}",
            allowed.join(", "),
            json_type(value)
        )));
    };
    if let Some(unknown) = params.keys().find(|k| !allowed.contains(&k.as_str())) {
        return Err(ConfigError::UnknownParameter {
            tag,
            param: unknown.clone(),
        });
    }
    Ok(params)
}

fn required<'a>(
    tag: IndicatorTag,
    params: &'a Map<String, Value>,
    param: &str,
) -> Result<&'a Value, ConfigError> {
    params.get(param).ok_or_else(|| ConfigError::MissingParameter {
        tag,
        param: param.to_string(),
    })
}

/// Accepts `20` and `20.0`; rejects zero, negatives, fractions, and non-numbers.
fn positive_int(tag: IndicatorTag, param: &str, value: &Value) -> Result<usize, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidParameter {
        tag,
        param: param.to_string(),
        reason,
    };
    let Value::Number(n) = value else {
        return Err(invalid(format!(
            "expected a positive integer, got {}",
            json_type(value)
        )));
    };
    if let Some(u) = n.as_u64() {
        return match usize::try_from(u) {
            Ok(0) => Err(invalid("must be at least 1".into())),
            Ok(u) => Ok(u),
            Err(_) => Err(invalid(format!("{u} is too large"))),
        };
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= 1.0 && f <= u32::MAX as f64 => Ok(f as usize),
        Some(f) if f.fract() == 0.0 => Err(invalid(format!("must be at least 1, got {f}"))),
        _ => Err(invalid(format!("expected a positive integer, got {n}"))),
    }
}

fn finite_number(tag: IndicatorTag, param: &str, value: &Value) -> Result<f64, ConfigError> {
    value
        .as_f64()
        .filter(|f| f.is_finite())
        .ok_or_else(|| ConfigError::InvalidParameter {
            tag,
            param: param.to_string(),
            reason: format!("expected a finite number, got {}", json_type(value)),
        })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
