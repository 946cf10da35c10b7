//! Error types for dataset access and loading.

use thiserror::Error;

/// Result type for dataset operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for dataset access and loading.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Missing required variable or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Selection on a dimension the variable does not have
    #[error("Variable {variable} has no dimension {dim}")]
    UnknownDimension { variable: String, dim: String },

    /// Selection index outside the dimension
    #[error("Index {index} out of range for dimension {dim} of length {len}")]
    IndexOutOfRange { dim: String, index: i64, len: usize },
}
