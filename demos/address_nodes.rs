//! Print the fully qualified name of every leaf in a pipeline document.
//!
//! Run with: cargo run --example address_nodes

use paramflow_parser::{fqn, inject_uuids, Tree, YamlParser};

const PIPELINE: &str = r#"
pipeline:
  name: payments
  stages:
    - stage:
        identifier: build
        variables:
          - name: flags
            value: "--release"
    - parallel:
        - stage:
            identifier: test-unit
        - stage:
            identifier: test-e2e
  tags:
    - nightly
    - critical
"#;

fn main() -> anyhow::Result<()> {
    let document = YamlParser::parse(PIPELINE)?;
    let tagged = inject_uuids(&document);
    let tree = Tree::from_document(&tagged);

    println!("leaf addresses:");
    for id in tree.node_ids() {
        let node = tree.node(id);
        if !node.is_scalar() {
            continue;
        }
        let path = fqn::fully_qualified_name(node);
        let value = node.scalar().cloned().unwrap_or_default();
        println!("  {path} = {value}");
    }

    let build = fqn::find_by_qualified_name(&tree, &["pipeline", "stages", "build"])
        .expect("build stage is addressable");
    println!("\nbuild stage uuid: {}", build.uuid().unwrap_or("-"));
    Ok(())
}
