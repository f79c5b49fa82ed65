//! Resolution engine builder

use crate::engine::ResolutionEngine;
use paramflow_runtime::{ExpressionEvaluator, ValidatorRegistry};

/// Builder for [`ResolutionEngine`]
pub struct ResolutionEngineBuilder<E> {
    evaluator: E,
    validators: ValidatorRegistry,
}

impl<E: ExpressionEvaluator> ResolutionEngineBuilder<E> {
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            validators: ValidatorRegistry::with_defaults(),
        }
    }

    /// Replace the validator registry
    pub fn validators(mut self, validators: ValidatorRegistry) -> Self {
        self.validators = validators;
        self
    }

    pub fn build(self) -> ResolutionEngine<E> {
        ResolutionEngine::with_validators(self.evaluator, self.validators)
    }
}
