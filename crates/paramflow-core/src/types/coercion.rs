//! Best-effort coercion of resolved values to declared kinds
//!
//! Coercion is never authoritative: failures are logged and the uncoerced
//! value is kept. Authoritative checks belong to the input-set validators.

use crate::error::{CoreError, Result};
use crate::types::kind::{EnumSpec, TargetKind};
use crate::types::timeout::Timeout;
use serde_json::{Number, Value};

/// Coerce `value` to `kind`, keeping the input unchanged when the
/// conversion cannot apply.
pub fn coerce(value: Value, kind: &TargetKind) -> Value {
    match try_coerce(&value, kind) {
        Ok(coerced) => coerced,
        Err(err) => {
            log::warn!("keeping uncoerced value: {err}");
            value
        }
    }
}

/// Fallible counterpart of [`coerce`].
///
/// Conversions with no rule for the source type return the value
/// unchanged; boolean and enum mismatches soft-fail the same way.
pub fn try_coerce(value: &Value, kind: &TargetKind) -> Result<Value> {
    match kind {
        TargetKind::Text | TargetKind::Opaque => Ok(value.clone()),
        TargetKind::Int => coerce_int(value),
        TargetKind::Float => coerce_float(value),
        TargetKind::Bool => Ok(coerce_bool(value)),
        TargetKind::Enum(spec) => Ok(coerce_enum(value, spec)),
        TargetKind::Duration => coerce_duration(value),
    }
}

fn coerce_int(value: &Value) -> Result<Value> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
        // fractional numbers narrow via truncation
        Value::Number(n) => {
            let truncated = n
                .as_f64()
                .map(|f| f.trunc() as i64)
                .ok_or_else(|| coercion_error("integer", value, "not representable"))?;
            Ok(Value::from(truncated))
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| coercion_error("integer", value, &e.to_string())),
        _ => Ok(value.clone()),
    }
}

fn coerce_float(value: &Value) -> Result<Value> {
    match value {
        Value::Number(n) if n.is_f64() => Ok(value.clone()),
        // integers widen
        Value::Number(n) => {
            let widened = n
                .as_i64()
                .map(|i| i as f64)
                .or_else(|| n.as_u64().map(|u| u as f64))
                .ok_or_else(|| coercion_error("float", value, "not representable"))?;
            Ok(Value::from(widened))
        }
        Value::String(s) => {
            let parsed: f64 = s
                .trim()
                .parse()
                .map_err(|e: std::num::ParseFloatError| coercion_error("float", value, &e.to_string()))?;
            Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or_else(|| coercion_error("float", value, "not a finite number"))
        }
        _ => Ok(value.clone()),
    }
}

fn coerce_bool(value: &Value) -> Value {
    if let Value::String(s) = value {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
    }
    value.clone()
}

fn coerce_enum(value: &Value, spec: &EnumSpec) -> Value {
    if let Value::String(s) = value {
        if let Some(constant) = spec.match_text(s.trim()) {
            return Value::String(constant.name.clone());
        }
    }
    value.clone()
}

fn coerce_duration(value: &Value) -> Result<Value> {
    match value {
        Value::String(s) => {
            // keep the author's spelling once the grammar accepts it
            s.parse::<Timeout>()
                .map(|_| value.clone())
                .map_err(|e| coercion_error("duration", value, &e.to_string()))
        }
        _ => Ok(value.clone()),
    }
}

fn coercion_error(target: &str, value: &Value, message: &str) -> CoreError {
    CoreError::CoercionFailure {
        target: target.to_string(),
        actual: value_type_name(value).to_string(),
        message: message.to_string(),
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::kind::EnumSpec;
    use serde_json::json;

    #[test]
    fn test_int_from_string() {
        assert_eq!(try_coerce(&json!("42"), &TargetKind::Int).unwrap(), json!(42));
        assert!(try_coerce(&json!("forty-two"), &TargetKind::Int).is_err());
    }

    #[test]
    fn test_int_from_float_truncates() {
        assert_eq!(try_coerce(&json!(3.9), &TargetKind::Int).unwrap(), json!(3));
        assert_eq!(try_coerce(&json!(-3.9), &TargetKind::Int).unwrap(), json!(-3));
    }

    #[test]
    fn test_int_already_int() {
        assert_eq!(try_coerce(&json!(7), &TargetKind::Int).unwrap(), json!(7));
    }

    #[test]
    fn test_float_from_string_and_int() {
        assert_eq!(
            try_coerce(&json!("3.25"), &TargetKind::Float).unwrap(),
            json!(3.25)
        );
        assert_eq!(try_coerce(&json!(4), &TargetKind::Float).unwrap(), json!(4.0));
        assert!(try_coerce(&json!("abc"), &TargetKind::Float).is_err());
    }

    #[test]
    fn test_bool_soft_fail() {
        assert_eq!(
            try_coerce(&json!("TRUE"), &TargetKind::Bool).unwrap(),
            json!(true)
        );
        assert_eq!(
            try_coerce(&json!("false"), &TargetKind::Bool).unwrap(),
            json!(false)
        );
        // non-matching text stays unchanged, no error
        assert_eq!(
            try_coerce(&json!("yes"), &TargetKind::Bool).unwrap(),
            json!("yes")
        );
    }

    #[test]
    fn test_enum_case_insensitive() {
        let kind = TargetKind::Enum(EnumSpec::new("Env").constant("A").constant("B"));
        assert_eq!(try_coerce(&json!("b"), &kind).unwrap(), json!("B"));
        // unmatched text stays unchanged
        assert_eq!(try_coerce(&json!("c"), &kind).unwrap(), json!("c"));
    }

    #[test]
    fn test_duration_validates_grammar() {
        assert_eq!(
            try_coerce(&json!("10m"), &TargetKind::Duration).unwrap(),
            json!("10m")
        );
        assert!(try_coerce(&json!("soon"), &TargetKind::Duration).is_err());
    }

    #[test]
    fn test_coerce_swallows_failures() {
        // best effort: the uncoerced value comes back, no panic, no error
        assert_eq!(coerce(json!("nope"), &TargetKind::Int), json!("nope"));
        assert_eq!(coerce(json!("42"), &TargetKind::Int), json!(42));
    }

    #[test]
    fn test_text_and_opaque_pass_through() {
        assert_eq!(
            try_coerce(&json!({"a": 1}), &TargetKind::Opaque).unwrap(),
            json!({"a": 1})
        );
        assert_eq!(
            try_coerce(&json!("as-is"), &TargetKind::Text).unwrap(),
            json!("as-is")
        );
    }
}
