//! Service configuration.
//!
//! Loaded from a TOML file; every field has a default, so an empty file (or
//! no file at all) gives the stock setup: data under `raw_data/`, the
//! artifact at `processed_data.csv`, and the three built-in tickers.
//!
//! ```toml
//! data_dir = "raw_data"
//! artifact_path = "processed_data.csv"
//! write_artifact = true
//!
//! [tickers]
//! Palantir = "PLTR"
//! Nvidia = "NVDA"
//! Paypal = "PYPL"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DATA_DIR: &str = "raw_data";
pub const DEFAULT_ARTIFACT_PATH: &str = "processed_data.csv";

#[derive(Debug, Error)]
pub enum ServiceConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Directory holding `{CODE}_raw.csv` files.
    pub data_dir: PathBuf,

    /// Where the processed table is written after each request.
    pub artifact_path: PathBuf,

    /// Set to false to skip the artifact entirely.
    pub write_artifact: bool,

    /// Display name → ticker code.
    pub tickers: BTreeMap<String, String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            write_artifact: true,
            tickers: default_tickers(),
        }
    }
}

impl ServiceConfig {
    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ServiceConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ServiceConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ServiceConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// The artifact path, or `None` when artifacts are switched off.
    pub fn artifact(&self) -> Option<&Path> {
        self.write_artifact.then_some(self.artifact_path.as_path())
    }
}

/// The built-in name → code map.
pub fn default_tickers() -> BTreeMap<String, String> {
    [("Palantir", "PLTR"), ("Nvidia", "NVDA"), ("Paypal", "PYPL")]
        .into_iter()
        .map(|(name, code)| (name.to_string(), code.to_string()))
        .collect()
}
