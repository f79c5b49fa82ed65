//! Expression evaluator capability
//!
//! The expression grammar is opaque to the resolution core: it only asks
//! an evaluator to render text, evaluate one expression, or deeply
//! resolve a value. `MapEvaluator` is the deterministic in-process
//! implementation used by tests, demos and local tooling; production
//! callers inject their own.

use crate::error::Result;
use paramflow_core::expressions;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Injected evaluation capability
pub trait ExpressionEvaluator {
    /// Render text as a string template, substituting `<+...>` tokens
    fn render_expression(&self, expression: &str) -> Result<String>;

    /// Evaluate one expression to a generic value
    fn evaluate_expression(&self, expression: &str) -> Result<JsonValue>;

    /// Deeply resolve a value whose nested strings may contain expressions
    fn resolve(&self, value: JsonValue) -> Result<JsonValue>;
}

/// Evaluator backed by a context map with dotted-path lookup.
///
/// Unknown references stay verbatim in the output, so partial resolution
/// and fixpoints behave exactly as with a remote evaluator that cannot
/// resolve them yet.
#[derive(Debug, Default)]
pub struct MapEvaluator {
    context: HashMap<String, JsonValue>,
}

impl MapEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(context: HashMap<String, JsonValue>) -> Self {
        Self { context }
    }

    /// Bind a dotted path to a value
    pub fn insert(&mut self, path: impl Into<String>, value: impl Into<JsonValue>) {
        self.context.insert(path.into(), value.into());
    }

    fn lookup(&self, path: &str) -> Option<JsonValue> {
        if let Some(value) = self.context.get(path) {
            return Some(value.clone());
        }
        // a bound prefix may hold an object the rest of the path walks into
        for (key, value) in &self.context {
            let Some(rest) = path
                .strip_prefix(key.as_str())
                .and_then(|r| r.strip_prefix('.'))
            else {
                continue;
            };
            let mut current = Some(value);
            for segment in rest.split('.') {
                current = current.and_then(|v| v.get(segment));
            }
            if let Some(found) = current {
                return Some(found.clone());
            }
        }
        None
    }
}

impl ExpressionEvaluator for MapEvaluator {
    fn render_expression(&self, expression: &str) -> Result<String> {
        Ok(expressions::replace_expressions(expression, |inner| {
            self.lookup(inner).map(|v| value_text(&v))
        }))
    }

    fn evaluate_expression(&self, expression: &str) -> Result<JsonValue> {
        if let Some(inner) = expressions::single_expression_inner(expression) {
            if let Some(value) = self.lookup(inner) {
                return Ok(value);
            }
            // unknown reference: the unresolved text comes back verbatim
            return Ok(JsonValue::String(expression.trim().to_string()));
        }
        Ok(JsonValue::String(self.render_expression(expression)?))
    }

    fn resolve(&self, value: JsonValue) -> Result<JsonValue> {
        Ok(match value {
            JsonValue::String(text) => {
                if expressions::is_single_expression(&text) {
                    self.evaluate_expression(&text)?
                } else if expressions::has_expression(&text) {
                    JsonValue::String(self.render_expression(&text)?)
                } else {
                    JsonValue::String(text)
                }
            }
            JsonValue::Array(items) => JsonValue::Array(
                items
                    .into_iter()
                    .map(|item| self.resolve(item))
                    .collect::<Result<_>>()?,
            ),
            JsonValue::Object(map) => {
                let mut resolved = serde_json::Map::new();
                for (key, item) in map {
                    resolved.insert(key, self.resolve(item)?);
                }
                JsonValue::Object(resolved)
            }
            other => other,
        })
    }
}

/// String rendering of a value for templates and validator messages
pub(crate) fn value_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => "null".to_string(),
        other => other.to_string(),
    }
}
