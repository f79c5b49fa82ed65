//! High-level resolution engine
//!
//! Glues the parse boundary, runtime-input merge and document resolver
//! into one facade. Per-field validation failures never abort a run;
//! they come back as FQN-tagged issues on the resolution.

use crate::builder::ResolutionEngineBuilder;
use crate::error::Result;
use paramflow_parser::{merge, Tree, YamlParser};
use paramflow_runtime::{
    DocumentResolution, DocumentResolver, ExpressionEvaluator, ValidatorRegistry,
};

/// Resolves whole pipeline documents against one evaluator
pub struct ResolutionEngine<E> {
    evaluator: E,
    validators: ValidatorRegistry,
}

impl<E: ExpressionEvaluator> ResolutionEngine<E> {
    /// Engine with the built-in validator checks
    pub fn new(evaluator: E) -> Self {
        Self::with_validators(evaluator, ValidatorRegistry::with_defaults())
    }

    pub fn builder(evaluator: E) -> ResolutionEngineBuilder<E> {
        ResolutionEngineBuilder::new(evaluator)
    }

    pub(crate) fn with_validators(evaluator: E, validators: ValidatorRegistry) -> Self {
        Self {
            evaluator,
            validators,
        }
    }

    /// Parse and resolve a template with no runtime inputs supplied.
    /// Unsupplied `<+input>` placeholders stay pending without error.
    pub fn resolve_yaml(&self, yaml: &str) -> Result<DocumentResolution> {
        let document = YamlParser::parse(yaml)?;
        let resolver = DocumentResolver::new(&self.evaluator, &self.validators);
        Ok(resolver.resolve_document(&document)?)
    }

    /// Merge a runtime-inputs document into a template, resolve, and
    /// validate every declared input that received a concrete value
    pub fn resolve_with_inputs(
        &self,
        template_yaml: &str,
        inputs_yaml: &str,
    ) -> Result<DocumentResolution> {
        let template = YamlParser::parse(template_yaml)?;
        let inputs = YamlParser::parse(inputs_yaml)?;

        let declarations = merge::runtime_input_declarations(&Tree::from_document(&template));
        let merged = merge::merge_runtime_inputs(&template, &inputs);

        let resolver = DocumentResolver::new(&self.evaluator, &self.validators);
        let mut tree = Tree::from_document(&merged);
        let mut issues = resolver.resolve_tree(&mut tree)?;
        issues.extend(resolver.validate_runtime_inputs(&tree, &declarations));

        Ok(DocumentResolution {
            document: tree.to_value(),
            issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paramflow_runtime::MapEvaluator;
    use serde_json::json;

    const TEMPLATE: &str = r#"
pipeline:
  name: payments
  stages:
    - stage:
        identifier: s1
        variables:
          - name: env
            value: "<+input>.allowedValues(dev,qa)"
          - name: greeting
            value: "hello <+pipeline.name>"
"#;

    fn engine() -> ResolutionEngine<MapEvaluator> {
        let mut evaluator = MapEvaluator::new();
        evaluator.insert("pipeline.name", "payments");
        ResolutionEngine::new(evaluator)
    }

    #[test]
    fn test_resolve_yaml_leaves_inputs_pending() {
        let resolution = engine().resolve_yaml(TEMPLATE).unwrap();
        assert!(resolution.issues.is_empty());
        let variables = &resolution.document["pipeline"]["stages"][0]["stage"]["variables"];
        assert_eq!(variables[0]["value"], json!("<+input>.allowedValues(dev,qa)"));
        assert_eq!(variables[1]["value"], json!("hello payments"));
    }

    #[test]
    fn test_resolve_with_valid_inputs() {
        let inputs = r#"
pipeline:
  stages:
    - stage:
        identifier: s1
        variables:
          - name: env
            value: qa
"#;
        let resolution = engine().resolve_with_inputs(TEMPLATE, inputs).unwrap();
        assert!(resolution.issues.is_empty());
        let variables = &resolution.document["pipeline"]["stages"][0]["stage"]["variables"];
        assert_eq!(variables[0]["value"], json!("qa"));
    }

    #[test]
    fn test_resolve_with_invalid_inputs_reports_issue() {
        let inputs = r#"
pipeline:
  stages:
    - stage:
        identifier: s1
        variables:
          - name: env
            value: prod
"#;
        let resolution = engine().resolve_with_inputs(TEMPLATE, inputs).unwrap();
        assert_eq!(resolution.issues.len(), 1);
        let issue = &resolution.issues[0];
        assert_eq!(issue.fqn, "pipeline.stages.s1.variables.env");
        assert_eq!(
            issue.result.expression.as_deref(),
            Some("<+input>.allowedValues(dev,qa)")
        );
        // the rest of the document still resolved
        let variables = &resolution.document["pipeline"]["stages"][0]["stage"]["variables"];
        assert_eq!(variables[1]["value"], json!("hello payments"));
    }

    #[test]
    fn test_malformed_yaml_is_fatal() {
        assert!(engine().resolve_yaml("pipeline: [unclosed").is_err());
    }
}
