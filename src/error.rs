//! Error types for the molino crate

use thiserror::Error;

/// Result type alias for molino operations
pub type Result<T> = std::result::Result<T, MolinoError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum MolinoError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Unsupported accept type: {0}")]
    UnsupportedAcceptType(String),
}

impl From<polars::error::PolarsError> for MolinoError {
    fn from(err: polars::error::PolarsError) -> Self {
        MolinoError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for MolinoError {
    fn from(err: serde_json::Error) -> Self {
        MolinoError::SerializationError(err.to_string())
    }
}
