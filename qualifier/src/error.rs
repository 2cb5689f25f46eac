//! Pipeline error types

use thiserror::Error;

use shared::ConfigError;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Infrastructure faults of the pipeline itself.
///
/// Per-profile fetch failures are not errors at this level; they are
/// recorded in the run statistics and the batch continues.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
