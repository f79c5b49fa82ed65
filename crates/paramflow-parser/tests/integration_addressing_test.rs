//! Integration tests for the parse -> tag -> address flow

use paramflow_parser::{fqn, inject_uuids, Tree, YamlParser, UUID_FIELD_NAME};

const PIPELINE_YAML: &str = r#"
pipeline:
  name: payments
  stages:
    - stage:
        identifier: s1
        variables:
          - name: x
            value: "<+input>"
"#;

#[test]
fn test_parse_tag_wrap_address() {
    let document = YamlParser::parse(PIPELINE_YAML).unwrap();
    let tagged = inject_uuids(&document);
    let tree = Tree::from_document(&tagged);

    // identities injected into the document survive wrapping
    let pipeline = tree.root().field("pipeline").unwrap().node;
    let injected = tagged["pipeline"][UUID_FIELD_NAME].as_str().unwrap();
    assert_eq!(pipeline.uuid(), Some(injected));
    assert_eq!(tree.find_by_uuid(injected).unwrap().id(), pipeline.id());

    let stage = fqn::find_by_qualified_name(&tree, &["pipeline", "stages", "s1"]).unwrap();
    let value = stage.field("variables").unwrap().node.as_array()[0]
        .field("value")
        .unwrap()
        .node;
    assert_eq!(
        fqn::fully_qualified_name(value),
        "pipeline.stages.s1.variables.x"
    );
}

#[test]
fn test_duplicate_keys_fail_at_parse_time() {
    let yaml = "pipeline:\n  name: a\n  name: b\n";
    assert!(YamlParser::parse(yaml).is_err());
}

#[test]
fn test_wrapped_tree_round_trips_unchanged() {
    let document = YamlParser::parse(PIPELINE_YAML).unwrap();
    let tree = Tree::from_document(&document);
    assert_eq!(tree.to_value(), document);
}
