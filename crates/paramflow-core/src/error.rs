//! Core error types

use thiserror::Error;

/// Core error
#[derive(Error, Debug)]
pub enum CoreError {
    /// Value could not be converted to its declared kind
    #[error("cannot coerce {actual} value to {target}: {message}")]
    CoercionFailure {
        target: String,
        actual: String,
        message: String,
    },

    /// Timeout text does not follow the `1w2d3h4m5s6ms` grammar
    #[error("invalid timeout '{0}'")]
    InvalidTimeout(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
