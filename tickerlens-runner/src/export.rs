//! Artifact export: the processed table as CSV.
//!
//! Header is the column names in processing order (`Date` first); one record
//! per row. Null cells are empty fields. Numbers use Rust's shortest
//! round-trip formatting, so `11.0` is written as `11`.

use std::path::{Path, PathBuf};

use tickerlens_core::{ArtifactSink, Cell, ProcessedTable, SinkError};
use tracing::debug;

// ─── CSV export ─────────────────────────────────────────────────────

/// Render a processed table as CSV text.
pub fn export_table_csv(table: &ProcessedTable) -> Result<String, csv::Error> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(table.columns())?;

    for row in table.rows() {
        wtr.write_record(row.cells().iter().map(|(_, cell)| render_cell(cell)))?;
    }

    let data = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    // Every field came from a Rust `String`.
    Ok(String::from_utf8_lossy(&data).into_owned())
}

fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Number(v) => v.to_string(),
        Cell::Text(s) => s.clone(),
        Cell::Null => String::new(),
    }
}

// ─── File sink ──────────────────────────────────────────────────────

/// Writes every processed table to one file, replacing what was there.
///
/// Concurrent requests race on the same path; the last writer wins.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArtifactSink for CsvFileSink {
    fn write(&self, table: &ProcessedTable) -> Result<(), SinkError> {
        let text = export_table_csv(table).map_err(|e| SinkError::Encode(e.to_string()))?;
        std::fs::write(&self.path, text)?;
        debug!(path = %self.path.display(), rows = table.len(), "wrote artifact");
        Ok(())
    }
}
