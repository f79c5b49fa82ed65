//! Input-set validator checks
//!
//! Turns validator descriptors into concrete checks. The registry is
//! built once and read-only afterwards.

use crate::evaluator::value_text;
use paramflow_core::{expressions, InputSetValidator, ValidatorKind};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Outcome of one validator check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub error_message: Option<String>,
}

impl ValidationOutcome {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error_message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error_message: Some(message.into()),
        }
    }
}

/// One validator implementation
pub trait ValidatorCheck: Send + Sync {
    fn check(&self, value: &JsonValue, parameters: &str) -> ValidationOutcome;
}

/// Value must be one of a comma-separated list
pub struct AllowedValuesCheck;

impl ValidatorCheck for AllowedValuesCheck {
    fn check(&self, value: &JsonValue, parameters: &str) -> ValidationOutcome {
        let text = value_text(value);
        if expressions::has_expression(&text) {
            // still unresolved: nothing to check yet
            return ValidationOutcome::ok();
        }
        let matched = parameters
            .split(',')
            .map(str::trim)
            .any(|candidate| candidate == text);
        if matched {
            ValidationOutcome::ok()
        } else {
            ValidationOutcome::invalid(format!(
                "'{text}' is not one of the allowed values ({parameters})"
            ))
        }
    }
}

/// Value must match a regular expression
pub struct RegexCheck;

impl ValidatorCheck for RegexCheck {
    fn check(&self, value: &JsonValue, parameters: &str) -> ValidationOutcome {
        let pattern = match regex::Regex::new(parameters) {
            Ok(pattern) => pattern,
            Err(err) => {
                return ValidationOutcome::invalid(format!(
                    "invalid regex '{parameters}': {err}"
                ))
            }
        };
        let text = value_text(value);
        if expressions::has_expression(&text) {
            return ValidationOutcome::ok();
        }
        if pattern.is_match(&text) {
            ValidationOutcome::ok()
        } else {
            ValidationOutcome::invalid(format!("'{text}' does not match regex '{parameters}'"))
        }
    }
}

/// Declared default; nothing left to check once a value exists
pub struct DefaultCheck;

impl ValidatorCheck for DefaultCheck {
    fn check(&self, _value: &JsonValue, _parameters: &str) -> ValidationOutcome {
        ValidationOutcome::ok()
    }
}

/// Registry of validator checks, keyed by descriptor kind
pub struct ValidatorRegistry {
    checks: HashMap<ValidatorKind, Box<dyn ValidatorCheck>>,
}

impl ValidatorRegistry {
    /// Empty registry; every check passes until something is registered
    pub fn new() -> Self {
        Self {
            checks: HashMap::new(),
        }
    }

    /// Registry with the three built-in checks
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ValidatorKind::AllowedValues, Box::new(AllowedValuesCheck));
        registry.register(ValidatorKind::Regex, Box::new(RegexCheck));
        registry.register(ValidatorKind::Default, Box::new(DefaultCheck));
        registry
    }

    pub fn register(&mut self, kind: ValidatorKind, check: Box<dyn ValidatorCheck>) {
        self.checks.insert(kind, check);
    }

    /// Check a value against a descriptor. Unknown kinds warn and pass;
    /// the descriptor still reaches diagnostics through the caller.
    pub fn check(&self, validator: &InputSetValidator, value: &JsonValue) -> ValidationOutcome {
        match self.checks.get(&validator.kind) {
            Some(check) => check.check(value, &validator.parameters),
            None => {
                tracing::warn!(
                    kind = validator.kind.keyword(),
                    "no checker registered, passing"
                );
                ValidationOutcome::ok()
            }
        }
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
