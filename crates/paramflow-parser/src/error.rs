//! Parser error types

use thiserror::Error;

/// Parser error
#[derive(Error, Debug)]
pub enum ParseError {
    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Duplicate mapping key; later entries must not silently win
    #[error("duplicate field '{field}'")]
    DuplicateField { field: String },

    /// Mapping key that is not a string
    #[error("non-string mapping key: {key}")]
    NonStringKey { key: String },

    /// Number that neither integer nor finite float can represent
    #[error("unrepresentable number: {0}")]
    UnrepresentableNumber(String),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
