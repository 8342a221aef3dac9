//! Pipeline: ordered indicator application, output normalization, and the
//! optional artifact hand-off.

pub mod normalize;
pub mod processor;
pub mod sink;

pub use normalize::{normalize, Cell, OutputRow, ProcessedTable};
pub use processor::{build_pipeline, Processor};
pub use sink::{ArtifactSink, SinkError};
