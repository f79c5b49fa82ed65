//! YAML parse boundary
//!
//! Parses YAML text into a generic `serde_json::Value` tree, failing fast
//! on documents the addressing layer cannot work with: duplicate mapping
//! keys and non-string keys are rejected here, never silently overwritten
//! downstream.

use crate::error::{ParseError, Result};
use serde_json::{Map, Number, Value as JsonValue};
use serde_yaml::Value as YamlValue;

/// YAML parser utilities
pub struct YamlParser;

impl YamlParser {
    /// Parse YAML text into a generic document value
    pub fn parse(yaml_str: &str) -> Result<JsonValue> {
        let value: YamlValue = serde_yaml::from_str(yaml_str)?;
        Self::convert(value)
    }

    fn convert(value: YamlValue) -> Result<JsonValue> {
        match value {
            YamlValue::Null => Ok(JsonValue::Null),
            YamlValue::Bool(b) => Ok(JsonValue::Bool(b)),
            YamlValue::Number(n) => Self::convert_number(n),
            YamlValue::String(s) => Ok(JsonValue::String(s)),
            YamlValue::Sequence(items) => Ok(JsonValue::Array(
                items
                    .into_iter()
                    .map(Self::convert)
                    .collect::<Result<Vec<_>>>()?,
            )),
            YamlValue::Mapping(mapping) => {
                let mut map = Map::new();
                for (key, value) in mapping {
                    let Some(field) = key.as_str() else {
                        return Err(ParseError::NonStringKey {
                            key: format!("{key:?}"),
                        });
                    };
                    if map
                        .insert(field.to_string(), Self::convert(value)?)
                        .is_some()
                    {
                        return Err(ParseError::DuplicateField {
                            field: field.to_string(),
                        });
                    }
                }
                Ok(JsonValue::Object(map))
            }
            YamlValue::Tagged(tagged) => Self::convert(tagged.value),
        }
    }

    fn convert_number(n: serde_yaml::Number) -> Result<JsonValue> {
        if let Some(i) = n.as_i64() {
            return Ok(JsonValue::from(i));
        }
        if let Some(u) = n.as_u64() {
            return Ok(JsonValue::from(u));
        }
        n.as_f64()
            .and_then(Number::from_f64)
            .map(JsonValue::Number)
            .ok_or_else(|| ParseError::UnrepresentableNumber(n.to_string()))
    }

    /// Get a required string field from a document object
    pub fn get_string(obj: &JsonValue, field: &str) -> Result<String> {
        obj.get(field)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ParseError::MissingField {
                field: field.to_string(),
            })
    }

    /// Get an optional string field from a document object
    pub fn get_optional_string(obj: &JsonValue, field: &str) -> Option<String> {
        obj.get(field)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Get a required array field from a document object
    pub fn get_array<'a>(obj: &'a JsonValue, field: &str) -> Result<&'a Vec<JsonValue>> {
        obj.get(field)
            .and_then(|v| v.as_array())
            .ok_or_else(|| ParseError::MissingField {
                field: field.to_string(),
            })
    }

    /// Get a field by path (e.g., "pipeline.name")
    pub fn get_nested_string(obj: &JsonValue, path: &str) -> Option<String> {
        let parts: Vec<&str> = path.split('.').collect();
        let mut current = obj;

        for part in &parts[..parts.len() - 1] {
            current = current.get(part)?;
        }

        current
            .get(parts[parts.len() - 1])
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Check if a field exists in a document object
    pub fn has_field(obj: &JsonValue, field: &str) -> bool {
        obj.get(field).is_some()
    }
}
