//! Deferred-value parameter fields
//!
//! A `ParameterField` is a configuration slot whose value may not be known
//! until execution time: either a concrete `Value` or an unresolved
//! `Expression`, plus the metadata needed to resolve and validate it later.
//! The two states are mutually exclusive; a resolution pass only ever moves
//! a field from `Expression` to `Value`, never back.

use crate::expressions;
use crate::types::kind::{TargetKind, TargetTyped};
use crate::types::validator::InputSetValidator;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Deferred-value slot: a resolved value or an unresolved expression
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterField<T> {
    state: FieldState<T>,
    is_type_string: bool,
    skip_auto_evaluation: bool,
    target_kind: TargetKind,
    validator: Option<InputSetValidator>,
    json_response_field: bool,
    response_field: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum FieldState<T> {
    Value(T),
    Expression(String),
}

/// Output of [`ParameterField::fetch_final_value`]: absence of a concrete
/// value is a legitimate terminal state, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalValue<'a, T> {
    /// Concrete resolved value
    Resolved(&'a T),
    /// Raw expression text, still pending resolution
    Pending(&'a str),
}

impl<T> ParameterField<T> {
    /// Wrap an already-known literal
    pub fn from_value(value: T) -> Self {
        Self::with_state(FieldState::Value(value))
    }

    /// Wrap unresolved expression text
    pub fn from_expression(raw: impl Into<String>) -> Self {
        Self::with_state(FieldState::Expression(raw.into()))
    }

    /// A `<+input>` placeholder to be supplied at execution time
    pub fn runtime_input() -> Self {
        Self::from_expression(expressions::RUNTIME_INPUT_MARKER)
    }

    fn with_state(state: FieldState<T>) -> Self {
        Self {
            state,
            is_type_string: false,
            skip_auto_evaluation: false,
            target_kind: TargetKind::Opaque,
            validator: None,
            json_response_field: false,
            response_field: None,
        }
    }

    /// Declare the coercion target; string-declared fields render their
    /// expressions as templates
    pub fn with_target_kind(mut self, kind: TargetKind) -> Self {
        self.is_type_string = kind.is_text();
        self.target_kind = kind;
        self
    }

    pub fn with_validator(mut self, validator: InputSetValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Opt this field out of automatic resolution
    pub fn with_skip_auto_evaluation(mut self, skip: bool) -> Self {
        self.skip_auto_evaluation = skip;
        self
    }

    /// Mark the field as filled in out-of-band from a named response field
    pub fn with_response_field(mut self, response_field: impl Into<String>) -> Self {
        self.response_field = Some(response_field.into());
        self
    }

    pub fn with_json_response_field(mut self, json_response_field: bool) -> Self {
        self.json_response_field = json_response_field;
        self
    }

    pub fn is_expression(&self) -> bool {
        matches!(self.state, FieldState::Expression(_))
    }

    /// Concrete value, if resolved
    pub fn value(&self) -> Option<&T> {
        match &self.state {
            FieldState::Value(v) => Some(v),
            FieldState::Expression(_) => None,
        }
    }

    /// Raw expression text, if unresolved
    pub fn expression_value(&self) -> Option<&str> {
        match &self.state {
            FieldState::Value(_) => None,
            FieldState::Expression(raw) => Some(raw),
        }
    }

    pub fn is_type_string(&self) -> bool {
        self.is_type_string
    }

    pub fn skip_auto_evaluation(&self) -> bool {
        self.skip_auto_evaluation
    }

    pub fn target_kind(&self) -> &TargetKind {
        &self.target_kind
    }

    pub fn validator(&self) -> Option<&InputSetValidator> {
        self.validator.as_ref()
    }

    pub fn response_field(&self) -> Option<&str> {
        self.response_field.as_deref()
    }

    pub fn json_response_field(&self) -> bool {
        self.json_response_field
    }

    /// Transition to a concrete value, clearing expression state
    pub fn update_with_value(&mut self, value: T) {
        self.state = FieldState::Value(value);
    }

    /// Stay in (or return to) expression state, used when a resolution
    /// pass only partially resolves the text
    pub fn update_with_expression(&mut self, raw: impl Into<String>) {
        self.state = FieldState::Expression(raw.into());
    }

    /// The concrete value if resolved, or the raw expression text if not;
    /// never fails
    pub fn fetch_final_value(&self) -> FinalValue<'_, T> {
        match &self.state {
            FieldState::Value(v) => FinalValue::Resolved(v),
            FieldState::Expression(raw) => FinalValue::Pending(raw),
        }
    }
}

impl<T: TargetTyped> ParameterField<T> {
    /// Literal with the kind declared by `T`
    pub fn typed_value(value: T) -> Self {
        Self::from_value(value).with_target_kind(T::target_kind())
    }

    /// Expression with the kind declared by `T`; runtime-input method
    /// suffixes become the field's validator
    pub fn typed_expression(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = expressions::parse_runtime_input(&raw);
        let mut field = Self::from_expression(raw).with_target_kind(T::target_kind());
        if let Some(input) = parsed {
            if let Some(validator) = input.validator {
                field = field.with_validator(validator);
            }
        }
        field
    }
}

impl<T: Serialize> Serialize for ParameterField<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.state {
            FieldState::Value(v) => v.serialize(serializer),
            FieldState::Expression(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de, T: DeserializeOwned + TargetTyped> Deserialize<'de> for ParameterField<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if let serde_json::Value::String(text) = &value {
            if expressions::has_expression(text) {
                return Ok(Self::typed_expression(text.clone()));
            }
        }
        let typed: T = serde_json::from_value(value).map_err(serde::de::Error::custom)?;
        Ok(Self::typed_value(typed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::validator::ValidatorKind;
    use serde_json::json;

    #[test]
    fn test_value_and_expression_are_exclusive() {
        let field: ParameterField<i64> = ParameterField::from_value(5);
        assert!(!field.is_expression());
        assert_eq!(field.value(), Some(&5));
        assert_eq!(field.expression_value(), None);

        let field: ParameterField<i64> = ParameterField::from_expression("<+a.b>");
        assert!(field.is_expression());
        assert_eq!(field.value(), None);
        assert_eq!(field.expression_value(), Some("<+a.b>"));
    }

    #[test]
    fn test_update_with_value_clears_expression() {
        let mut field: ParameterField<String> = ParameterField::from_expression("<+name>");
        field.update_with_value("payments".to_string());
        assert!(!field.is_expression());
        assert_eq!(field.value().map(String::as_str), Some("payments"));
    }

    #[test]
    fn test_update_with_expression_keeps_pending() {
        let mut field: ParameterField<String> = ParameterField::from_expression("<+outer>");
        field.update_with_expression("<+inner>");
        assert_eq!(field.expression_value(), Some("<+inner>"));
    }

    #[test]
    fn test_fetch_final_value_never_fails() {
        let field: ParameterField<i64> = ParameterField::from_value(42);
        assert_eq!(field.fetch_final_value(), FinalValue::Resolved(&42));

        let field: ParameterField<i64> = ParameterField::from_expression("<+input>");
        assert_eq!(field.fetch_final_value(), FinalValue::Pending("<+input>"));
    }

    #[test]
    fn test_string_fields_render_as_templates() {
        let field = ParameterField::<String>::typed_expression("<+pipeline.name>");
        assert!(field.is_type_string());

        let field = ParameterField::<i64>::typed_expression("<+count>");
        assert!(!field.is_type_string());
    }

    #[test]
    fn test_typed_expression_picks_up_validator() {
        let field = ParameterField::<String>::typed_expression("<+input>.allowedValues(a,b)");
        let validator = field.validator().unwrap();
        assert_eq!(validator.kind, ValidatorKind::AllowedValues);
        assert_eq!(validator.parameters, "a,b");
    }

    #[test]
    fn test_runtime_input_constructor() {
        let field: ParameterField<serde_json::Value> = ParameterField::runtime_input();
        assert_eq!(field.expression_value(), Some("<+input>"));
    }

    #[test]
    fn test_deserialize_literal() {
        let field: ParameterField<i64> = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(field.value(), Some(&7));
        assert_eq!(field.target_kind(), &TargetKind::Int);
    }

    #[test]
    fn test_deserialize_expression() {
        let field: ParameterField<i64> = serde_json::from_value(json!("<+stage.count>")).unwrap();
        assert!(field.is_expression());
        assert_eq!(field.expression_value(), Some("<+stage.count>"));
    }

    #[test]
    fn test_serialize_both_states() {
        let field: ParameterField<i64> = ParameterField::from_value(3);
        assert_eq!(serde_json::to_value(&field).unwrap(), json!(3));

        let field: ParameterField<i64> = ParameterField::from_expression("<+n>");
        assert_eq!(serde_json::to_value(&field).unwrap(), json!("<+n>"));
    }

    #[test]
    fn test_response_field_metadata() {
        let field = ParameterField::<serde_json::Value>::runtime_input()
            .with_response_field("execution.output")
            .with_json_response_field(true);
        assert_eq!(field.response_field(), Some("execution.output"));
        assert!(field.json_response_field());
        // out-of-band metadata does not affect the resolution state
        assert!(field.is_expression());
    }

    #[test]
    fn test_skip_auto_evaluation_flag() {
        let field = ParameterField::<String>::typed_expression("<+secret>")
            .with_skip_auto_evaluation(true);
        assert!(field.skip_auto_evaluation());
    }
}
