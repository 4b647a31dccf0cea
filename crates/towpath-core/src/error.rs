//! Error types for wind definition loading and validation.

use thiserror::Error;

/// Errors raised while loading or validating a wind definition.
#[derive(Error, Debug)]
pub enum WindFileError {
    /// The wind file could not be read.
    #[error("Failed to read wind file: {0}")]
    Io(#[from] std::io::Error),

    /// The wind file is not valid JSON for the schema.
    #[error("Invalid wind file: {0}")]
    Parse(#[from] serde_json::Error),

    /// A parameter value violates a schema constraint.
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        /// Dotted path of the offending field, wire-format names.
        field: String,
        /// The rejected value.
        value: f64,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Result type alias for wind file operations.
pub type WindFileResult<T> = Result<T, WindFileError>;
