//! Error taxonomy for the pipeline core.
//!
//! I/O-facing layers (parsing, config, output, publishing) use `anyhow`;
//! the pipeline stages return [`PipelineError`] so callers can tell a bad
//! selection apart from an empty one.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The selection cannot be applied (reversed range, unknown code).
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// The selection matched no records.
    #[error("no data in selection")]
    EmptyResult,

    /// A raw record broke a dataset invariant and was excluded.
    #[error("malformed record at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
