//! Per-field expression resolution
//!
//! Drives one parameter field against the injected evaluator: renders or
//! evaluates the raw text, detects partial resolution and fixpoints,
//! deep-resolves nested values, coerces to the declared kind, and runs
//! the field's validator. Fixpoints and null values are terminal no-ops,
//! never failures.

use crate::error::Result;
use crate::evaluator::ExpressionEvaluator;
use crate::validators::ValidatorRegistry;
use paramflow_core::{coerce, expressions, ParameterField};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Outcome of processing one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorResult {
    pub error: bool,
    /// Reconstructed validator expression tied to the failure
    pub expression: Option<String>,
    pub message: Option<String>,
}

impl ProcessorResult {
    pub fn ok() -> Self {
        Self {
            error: false,
            expression: None,
            message: None,
        }
    }

    pub fn validation_failure(expression: String, message: String) -> Self {
        Self {
            error: true,
            expression: Some(expression),
            message: Some(message),
        }
    }
}

/// Resolves single parameter fields against an evaluator and a validator
/// registry
pub struct FieldProcessor<'a, E: ExpressionEvaluator> {
    evaluator: &'a E,
    validators: &'a ValidatorRegistry,
}

impl<'a, E: ExpressionEvaluator> FieldProcessor<'a, E> {
    pub fn new(evaluator: &'a E, validators: &'a ValidatorRegistry) -> Self {
        Self {
            evaluator,
            validators,
        }
    }

    /// Attempt to fully resolve one field
    pub fn process(&self, field: &mut ParameterField<JsonValue>) -> Result<ProcessorResult> {
        if field.skip_auto_evaluation() {
            return Ok(ProcessorResult::ok());
        }

        if let Some(raw) = field.expression_value().map(str::to_string) {
            let evaluated = if field.is_type_string() {
                JsonValue::String(self.evaluator.render_expression(&raw)?)
            } else {
                self.evaluator.evaluate_expression(&raw)?
            };

            if let JsonValue::String(text) = &evaluated {
                if expressions::has_expression(text) {
                    if *text == raw {
                        // stable fixpoint: still pending external input
                        tracing::debug!(expression = %raw, "expression did not progress");
                        return Ok(ProcessorResult::ok());
                    }
                    // partial resolution: keep the new expression text
                    field.update_with_expression(text.clone());
                    return Ok(self.run_validator(field, &evaluated));
                }
            }
            field.update_with_value(evaluated);
        }

        let Some(value) = field.value() else {
            return Ok(ProcessorResult::ok());
        };
        if value.is_null() {
            return Ok(ProcessorResult::ok());
        }

        // the inner value may itself carry nested unresolved expressions
        let resolved = self.evaluator.resolve(value.clone())?;
        let coerced = coerce(resolved, field.target_kind());
        field.update_with_value(coerced);

        let current = field.value().cloned().unwrap_or(JsonValue::Null);
        Ok(self.run_validator(field, &current))
    }

    fn run_validator(
        &self,
        field: &ParameterField<JsonValue>,
        value: &JsonValue,
    ) -> ProcessorResult {
        let Some(validator) = field.validator() else {
            return ProcessorResult::ok();
        };
        let outcome = self.validators.check(validator, value);
        if outcome.valid {
            ProcessorResult::ok()
        } else {
            ProcessorResult::validation_failure(
                validator.as_expression(),
                outcome
                    .error_message
                    .unwrap_or_else(|| "invalid value".to_string()),
            )
        }
    }
}
