//! SDK error types

use thiserror::Error;

/// SDK error
#[derive(Error, Debug)]
pub enum SdkError {
    /// The document failed to parse
    #[error("parse error: {0}")]
    Parse(#[from] paramflow_parser::ParseError),

    /// Resolution failed outside any single field
    #[error("runtime error: {0}")]
    Runtime(#[from] paramflow_runtime::RuntimeError),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
