//! Structural identity tagging
//!
//! Stamps object nodes with fresh `__uuid` fields, and optionally turns a
//! document into an id skeleton whose leaves can be compared against the
//! original to track moved or edited values without storing them twice.
//! Both transforms are pure; malformed input must be rejected at the parse
//! boundary before this stage runs.

use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

/// Field under which object identity is stored
pub const UUID_FIELD_NAME: &str = "__uuid";

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Give every object node a fresh `__uuid` field, leaves untouched.
/// Re-running on an already-tagged tree replaces the old ids.
pub fn inject_uuids(document: &JsonValue) -> JsonValue {
    match document {
        JsonValue::Object(map) => {
            let mut tagged = Map::new();
            tagged.insert(UUID_FIELD_NAME.to_string(), JsonValue::String(new_id()));
            for (name, value) in map {
                if name == UUID_FIELD_NAME {
                    continue;
                }
                tagged.insert(name.clone(), inject_uuids(value));
            }
            JsonValue::Object(tagged)
        }
        JsonValue::Array(items) => {
            JsonValue::Array(items.iter().map(inject_uuids).collect())
        }
        scalar => scalar.clone(),
    }
}

/// Skeleton transform: every object gains a fresh `__uuid`, ordinary
/// scalar leaves are replaced by fresh ids, and scalar-only arrays
/// collapse to a single id. `identifier` stays literal so addressing
/// keeps working; `name` is tagged on identifier-bearing objects and
/// `key` whenever `identifier` or `name` is present.
pub fn inject_uuids_with_leaf_ids(document: &JsonValue) -> JsonValue {
    match document {
        JsonValue::Object(map) => skeleton_object(map),
        JsonValue::Array(items) => skeleton_array(items),
        scalar => scalar.clone(),
    }
}

fn skeleton_object(map: &Map<String, JsonValue>) -> JsonValue {
    let mut tagged = Map::new();
    tagged.insert(UUID_FIELD_NAME.to_string(), JsonValue::String(new_id()));

    let mut has_identifier = false;
    let mut has_name = false;
    let mut has_key = false;

    for (name, value) in map {
        if name == UUID_FIELD_NAME {
            continue;
        }
        match value {
            JsonValue::Object(inner) => {
                tagged.insert(name.clone(), skeleton_object(inner));
            }
            JsonValue::Array(items) => {
                tagged.insert(name.clone(), skeleton_array(items));
            }
            scalar => match name.as_str() {
                // addressing depends on the literal identifier
                "identifier" => {
                    has_identifier = true;
                    tagged.insert(name.clone(), scalar.clone());
                }
                "name" => {
                    has_name = true;
                    tagged.insert(name.clone(), scalar.clone());
                }
                "key" => {
                    has_key = true;
                    tagged.insert(name.clone(), scalar.clone());
                }
                _ => {
                    tagged.insert(name.clone(), JsonValue::String(new_id()));
                }
            },
        }
    }

    // name edits stay trackable once the identifier carries addressing
    if has_identifier && has_name {
        tagged.insert("name".to_string(), JsonValue::String(new_id()));
    }
    if has_key && (has_identifier || has_name) {
        tagged.insert("key".to_string(), JsonValue::String(new_id()));
    }

    JsonValue::Object(tagged)
}

fn skeleton_array(items: &[JsonValue]) -> JsonValue {
    let only_scalars = items.iter().all(|v| !v.is_object() && !v.is_array());
    if only_scalars {
        // individual scalars in a primitive array are not addressable,
        // so the array is tagged as a whole
        return JsonValue::String(new_id());
    }
    JsonValue::Array(
        items
            .iter()
            .map(|item| match item {
                JsonValue::Object(map) => skeleton_object(map),
                JsonValue::Array(inner) => skeleton_array(inner),
                _ => JsonValue::String(new_id()),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uuid_of(value: &JsonValue) -> &str {
        value
            .get(UUID_FIELD_NAME)
            .and_then(JsonValue::as_str)
            .expect("object is tagged")
    }

    #[test]
    fn test_every_object_gets_uuid() {
        let doc = json!({
            "pipeline": {
                "stages": [
                    {"stage": {"identifier": "s1"}}
                ]
            }
        });
        let tagged = inject_uuids(&doc);
        assert!(tagged.get(UUID_FIELD_NAME).is_some());
        assert!(tagged["pipeline"].get(UUID_FIELD_NAME).is_some());
        assert!(tagged["pipeline"]["stages"][0].get(UUID_FIELD_NAME).is_some());
        assert!(tagged["pipeline"]["stages"][0]["stage"]
            .get(UUID_FIELD_NAME)
            .is_some());
        // leaves untouched
        assert_eq!(
            tagged["pipeline"]["stages"][0]["stage"]["identifier"],
            json!("s1")
        );
    }

    #[test]
    fn test_rerun_replaces_ids() {
        let doc = json!({"a": {"b": 1}});
        let first = inject_uuids(&doc);
        let second = inject_uuids(&first);
        assert_ne!(uuid_of(&first), uuid_of(&second));
        assert_ne!(uuid_of(&first["a"]), uuid_of(&second["a"]));
        // no duplicated __uuid entries
        assert_eq!(second.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_skeleton_replaces_plain_leaves() {
        let doc = json!({"command": "make", "timeout": "10m"});
        let skeleton = inject_uuids_with_leaf_ids(&doc);
        assert_ne!(skeleton["command"], json!("make"));
        assert_ne!(skeleton["timeout"], json!("10m"));
        assert_ne!(skeleton["command"], skeleton["timeout"]);
    }

    #[test]
    fn test_skeleton_keeps_identifier_literal() {
        let doc = json!({"identifier": "s1", "name": "Stage One", "command": "make"});
        let skeleton = inject_uuids_with_leaf_ids(&doc);
        assert_eq!(skeleton["identifier"], json!("s1"));
        // name is tagged because the object is identifier-bearing
        assert_ne!(skeleton["name"], json!("Stage One"));
    }

    #[test]
    fn test_skeleton_keeps_lone_name_literal() {
        let doc = json!({"name": "x", "value": "y"});
        let skeleton = inject_uuids_with_leaf_ids(&doc);
        // without an identifier the name itself carries addressing
        assert_eq!(skeleton["name"], json!("x"));
        assert_ne!(skeleton["value"], json!("y"));
    }

    #[test]
    fn test_skeleton_key_rules() {
        let with_name = json!({"name": "n", "key": "k"});
        let skeleton = inject_uuids_with_leaf_ids(&with_name);
        assert_ne!(skeleton["key"], json!("k"));

        let lone_key = json!({"key": "k", "value": "v"});
        let skeleton = inject_uuids_with_leaf_ids(&lone_key);
        assert_eq!(skeleton["key"], json!("k"));
    }

    #[test]
    fn test_scalar_array_tagged_as_whole() {
        let doc = json!({"tags": ["a", "b", "c"]});
        let skeleton = inject_uuids_with_leaf_ids(&doc);
        assert!(skeleton["tags"].is_string());
    }

    #[test]
    fn test_object_array_tagged_per_element() {
        let doc = json!({"variables": [{"name": "x", "value": "1"}]});
        let skeleton = inject_uuids_with_leaf_ids(&doc);
        let variables = skeleton["variables"].as_array().unwrap();
        assert!(variables[0].get(UUID_FIELD_NAME).is_some());
        assert_eq!(variables[0]["name"], json!("x"));
        assert_ne!(variables[0]["value"], json!("1"));
    }

    #[test]
    fn test_rerun_skeleton_produces_new_skeleton() {
        let doc = json!({"a": {"identifier": "id", "v": "1"}});
        let first = inject_uuids_with_leaf_ids(&doc);
        let second = inject_uuids_with_leaf_ids(&first);
        assert_ne!(first, second);
        assert_eq!(second["a"]["identifier"], json!("id"));
    }
}
