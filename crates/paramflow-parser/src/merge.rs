//! Runtime-input merge
//!
//! Splices a user-supplied inputs document back into a template: every
//! `<+input>`-marked leaf takes the value found at the same position in
//! the inputs document, with array elements aligned by their unique
//! identifier rather than by index. Leaves that are not runtime inputs
//! keep their template value no matter what the inputs document says.

use crate::fqn;
use crate::tree::Tree;
use paramflow_core::expressions;
use paramflow_core::InputSetValidator;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One runtime-input slot declared by a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeInputDeclaration {
    /// Dotted path of the leaf, for diagnostics and lookups
    pub fqn: String,
    pub validator: Option<InputSetValidator>,
    pub default: Option<String>,
}

/// Enumerate every `<+input>` leaf of a document, in document order
pub fn runtime_input_declarations(tree: &Tree) -> Vec<RuntimeInputDeclaration> {
    let mut declarations = Vec::new();
    for id in tree.node_ids() {
        let node = tree.node(id);
        let Some(text) = node.as_str() else { continue };
        let Some(input) = expressions::parse_runtime_input(text) else {
            continue;
        };
        declarations.push(RuntimeInputDeclaration {
            fqn: fqn::fully_qualified_name(node),
            validator: input.validator,
            default: input.default,
        });
    }
    declarations
}

/// Merge a runtime-inputs document into a template.
///
/// Runtime inputs with no supplied value fall back to their declared
/// default, or keep the marker so a later resolution pass still sees
/// them as pending.
pub fn merge_runtime_inputs(template: &JsonValue, inputs: &JsonValue) -> JsonValue {
    merge_value(template, Some(inputs))
}

fn merge_value(template: &JsonValue, input: Option<&JsonValue>) -> JsonValue {
    match template {
        JsonValue::Object(map) => {
            let mut merged = serde_json::Map::new();
            for (name, value) in map {
                let supplied = input.and_then(|i| i.get(name));
                merged.insert(name.clone(), merge_value(value, supplied));
            }
            JsonValue::Object(merged)
        }
        JsonValue::Array(items) => JsonValue::Array(
            items
                .iter()
                .map(|item| {
                    let supplied = input.and_then(|i| matching_element(item, i));
                    merge_value(item, supplied)
                })
                .collect(),
        ),
        scalar => merge_scalar(scalar, input),
    }
}

fn merge_scalar(template: &JsonValue, input: Option<&JsonValue>) -> JsonValue {
    let declared = template
        .as_str()
        .and_then(expressions::parse_runtime_input);
    let Some(declared) = declared else {
        if input.is_some_and(|value| value != template) {
            log::debug!("ignoring supplied value for a leaf that is not a runtime input");
        }
        return template.clone();
    };
    if let Some(value) = input {
        // input sets sometimes echo the marker back; that is not a value
        let echoes_marker = value.as_str().is_some_and(expressions::is_runtime_input);
        if !echoes_marker {
            return value.clone();
        }
    }
    if let Some(default) = declared.default {
        return JsonValue::String(default);
    }
    template.clone()
}

fn matching_element<'a>(
    template_item: &JsonValue,
    inputs: &'a JsonValue,
) -> Option<&'a JsonValue> {
    let JsonValue::Array(candidates) = inputs else {
        return None;
    };
    let key = element_key(template_item)?;
    candidates.iter().find(|c| element_key(c) == Some(key))
}

fn element_key(item: &JsonValue) -> Option<&str> {
    let JsonValue::Object(map) = item else {
        return None;
    };
    for field in ["identifier", "name", "key"] {
        if let Some(value) = map.get(field).and_then(JsonValue::as_str) {
            return Some(value);
        }
    }
    // wrapper elements like {stage: {...}} key on their single child
    if map.len() == 1 {
        if let Some((_, JsonValue::Object(inner))) = map.iter().next() {
            for field in ["identifier", "name", "key"] {
                if let Some(value) = inner.get(field).and_then(JsonValue::as_str) {
                    return Some(value);
                }
            }
        }
    }
    None
}
