//! Shared error types for the lead qualification pipeline

use thiserror::Error;

/// Configuration problems detected before any fetch is issued.
///
/// These are the only fatal errors in the system; per-profile fetch failures
/// are recovered or recorded, never propagated past the pipeline.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("scoring weights sum to {sum:.3}, expected 1.0 within ±{tolerance}")]
    WeightSum { sum: f64, tolerance: f64 },

    #[error("invalid configuration: {field} = {value}")]
    InvalidField { field: String, value: String },

    #[error("no profile URLs provided")]
    NoProfiles,

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn invalid_field(field: impl Into<String>, value: impl ToString) -> Self {
        ConfigError::InvalidField {
            field: field.into(),
            value: value.to_string(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
