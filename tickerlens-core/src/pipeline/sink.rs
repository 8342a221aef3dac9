//! ArtifactSink: optional capability that receives each processed table.
//!
//! The pipeline hands the sink a snapshot after normalization. Sinks are
//! best-effort: the processor logs a failure and still returns the rows.

use thiserror::Error;

use super::normalize::ProcessedTable;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding error: {0}")]
    Encode(String),
}

pub trait ArtifactSink: Send + Sync {
    fn write(&self, table: &ProcessedTable) -> Result<(), SinkError>;
}

/// Closures work as sinks, which keeps ad-hoc capture in tests short.
impl<F> ArtifactSink for F
where
    F: Fn(&ProcessedTable) -> Result<(), SinkError> + Send + Sync,
{
    fn write(&self, table: &ProcessedTable) -> Result<(), SinkError> {
        self(table)
    }
}
