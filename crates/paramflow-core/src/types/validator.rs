//! Input-set validator descriptors
//!
//! A validator is a declarative constraint attached to a runtime input.
//! The descriptor is data only; checking happens in the runtime crate
//! through the validator registry.

use crate::expressions::RUNTIME_INPUT_MARKER;
use serde::{Deserialize, Serialize};

/// Kind of constraint attached to a runtime input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidatorKind {
    /// Value must be one of a comma-separated list
    AllowedValues,
    /// Value must match a regular expression
    Regex,
    /// Fallback value, always considered valid
    Default,
}

impl ValidatorKind {
    /// Method name used in the textual `<+input>.<method>(...)` form
    pub fn keyword(&self) -> &'static str {
        match self {
            ValidatorKind::AllowedValues => "allowedValues",
            ValidatorKind::Regex => "regex",
            ValidatorKind::Default => "default",
        }
    }
}

/// Declarative constraint on a runtime input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSetValidator {
    /// Which constraint to apply
    pub kind: ValidatorKind,
    /// Raw parameter text, e.g. `dev,qa,prod` or a regex pattern
    pub parameters: String,
}

impl InputSetValidator {
    pub fn new(kind: ValidatorKind, parameters: impl Into<String>) -> Self {
        Self {
            kind,
            parameters: parameters.into(),
        }
    }

    /// Reconstruct the textual form for diagnostics,
    /// e.g. `<+input>.allowedValues(a,b,c)`
    pub fn as_expression(&self) -> String {
        format!(
            "{}.{}({})",
            RUNTIME_INPUT_MARKER,
            self.kind.keyword(),
            self.parameters
        )
    }
}
