//! Resolve a pipeline template against supplied runtime inputs.
//!
//! Run with: cargo run --example resolve_pipeline

use paramflow_sdk::{MapEvaluator, ResolutionEngine};

const TEMPLATE: &str = r#"
pipeline:
  name: payments
  stages:
    - stage:
        identifier: deploy
        timeout: "<+input>.default(15m)"
        variables:
          - name: environment
            value: "<+input>.allowedValues(dev,qa,prod)"
          - name: image
            value: "registry/<+pipeline.name>:<+pipeline.tag>"
"#;

const INPUTS: &str = r#"
pipeline:
  stages:
    - stage:
        identifier: deploy
        variables:
          - name: environment
            value: staging
"#;

fn main() -> anyhow::Result<()> {
    let mut evaluator = MapEvaluator::new();
    evaluator.insert("pipeline.name", "payments");
    evaluator.insert("pipeline.tag", "v42");

    let engine = ResolutionEngine::new(evaluator);
    let resolution = engine.resolve_with_inputs(TEMPLATE, INPUTS)?;

    println!("resolved document:");
    println!("{}", serde_json::to_string_pretty(&resolution.document)?);

    if resolution.issues.is_empty() {
        println!("\nno validation issues");
    } else {
        println!("\nvalidation issues:");
        for issue in &resolution.issues {
            println!(
                "  {} -> {} ({})",
                issue.fqn,
                issue.result.message.as_deref().unwrap_or("invalid"),
                issue.result.expression.as_deref().unwrap_or("")
            );
        }
    }
    Ok(())
}
