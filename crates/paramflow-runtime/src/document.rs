//! Document-level resolution
//!
//! Walks a wrapped document in outer-to-inner, left-to-right order,
//! resolves every expression-bearing scalar leaf through the field
//! processor, writes resolved values back in place, and ties every
//! failure to the leaf's fully qualified name. Sibling fields keep
//! resolving after a failure.

use crate::error::Result;
use crate::evaluator::ExpressionEvaluator;
use crate::processor::{FieldProcessor, ProcessorResult};
use crate::validators::ValidatorRegistry;
use paramflow_core::{expressions, FinalValue, ParameterField, TargetKind};
use paramflow_parser::merge::RuntimeInputDeclaration;
use paramflow_parser::{fqn, NodeId, Tree};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One per-field failure tied to its address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionIssue {
    pub fqn: String,
    pub result: ProcessorResult,
}

/// A resolved document plus everything that went wrong on the way
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResolution {
    pub document: JsonValue,
    pub issues: Vec<ResolutionIssue>,
}

/// Resolves whole documents leaf by leaf
pub struct DocumentResolver<'a, E: ExpressionEvaluator> {
    evaluator: &'a E,
    validators: &'a ValidatorRegistry,
}

impl<'a, E: ExpressionEvaluator> DocumentResolver<'a, E> {
    pub fn new(evaluator: &'a E, validators: &'a ValidatorRegistry) -> Self {
        Self {
            evaluator,
            validators,
        }
    }

    /// Resolve every expression leaf of `tree` in place
    pub fn resolve_tree(&self, tree: &mut Tree) -> Result<Vec<ResolutionIssue>> {
        let processor = FieldProcessor::new(self.evaluator, self.validators);
        let mut issues = Vec::new();

        // collect first: processing overwrites scalar contents
        let pending: Vec<(NodeId, String, String)> = tree
            .node_ids()
            .filter_map(|id| {
                let node = tree.node(id);
                let text = node.as_str()?;
                if !expressions::has_expression(text) {
                    return None;
                }
                Some((id, text.to_string(), fqn::fully_qualified_name(node)))
            })
            .collect();

        for (id, raw, path) in pending {
            let mut field = ParameterField::<JsonValue>::from_expression(raw.clone())
                .with_target_kind(TargetKind::Text);
            if let Some(input) = expressions::parse_runtime_input(&raw) {
                if let Some(validator) = input.validator {
                    field = field.with_validator(validator);
                }
            }

            let result = processor.process(&mut field)?;
            match field.fetch_final_value() {
                FinalValue::Resolved(value) => {
                    tree.set_scalar(id, value.clone());
                }
                // partially resolved: keep the newer expression text
                FinalValue::Pending(text) if text != raw => {
                    tree.set_scalar(id, JsonValue::String(text.to_string()));
                }
                FinalValue::Pending(_) => {}
            }
            if result.error {
                tracing::debug!(fqn = %path, "field failed validation");
                issues.push(ResolutionIssue { fqn: path, result });
            }
        }
        Ok(issues)
    }

    /// Resolve a document value, returning the rewritten document
    pub fn resolve_document(&self, document: &JsonValue) -> Result<DocumentResolution> {
        let mut tree = Tree::from_document(document);
        let issues = self.resolve_tree(&mut tree)?;
        Ok(DocumentResolution {
            document: tree.to_value(),
            issues,
        })
    }

    /// Re-check declared runtime inputs whose slots now hold concrete
    /// values, e.g. after an inputs document was merged in
    pub fn validate_runtime_inputs(
        &self,
        tree: &Tree,
        declarations: &[RuntimeInputDeclaration],
    ) -> Vec<ResolutionIssue> {
        let mut issues = Vec::new();
        for declaration in declarations {
            let Some(validator) = &declaration.validator else {
                continue;
            };
            let segments: Vec<&str> = declaration.fqn.split('.').collect();
            let Some(node) = fqn::find_by_qualified_name(tree, &segments) else {
                continue;
            };
            // the path addresses the variable; for element objects the
            // supplied value lives in their `value` field
            let target = node.field("value").map(|f| f.node).unwrap_or(node);
            let Some(value) = target.scalar() else {
                continue;
            };
            if value.as_str().is_some_and(expressions::is_runtime_input) {
                continue;
            }
            let outcome = self.validators.check(validator, value);
            if !outcome.valid {
                issues.push(ResolutionIssue {
                    fqn: declaration.fqn.clone(),
                    result: ProcessorResult::validation_failure(
                        validator.as_expression(),
                        outcome
                            .error_message
                            .unwrap_or_else(|| "invalid value".to_string()),
                    ),
                });
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::MapEvaluator;
    use paramflow_parser::YamlParser;
    use serde_json::json;

    const PIPELINE_YAML: &str = r#"
pipeline:
  name: payments
  stages:
    - stage:
        identifier: s1
        variables:
          - name: x
            value: "<+input>"
          - name: greeting
            value: "hello <+pipeline.name>"
"#;

    fn resolver_parts() -> (MapEvaluator, ValidatorRegistry) {
        let mut evaluator = MapEvaluator::new();
        evaluator.insert("pipeline.name", "payments");
        (evaluator, ValidatorRegistry::with_defaults())
    }

    #[test]
    fn test_resolves_expressions_and_leaves_inputs_pending() {
        let (evaluator, validators) = resolver_parts();
        let resolver = DocumentResolver::new(&evaluator, &validators);
        let document = YamlParser::parse(PIPELINE_YAML).unwrap();
        let resolution = resolver.resolve_document(&document).unwrap();

        assert!(resolution.issues.is_empty());
        let variables = &resolution.document["pipeline"]["stages"][0]["stage"]["variables"];
        // no supplied input: the placeholder stays, without error
        assert_eq!(variables[0]["value"], json!("<+input>"));
        assert_eq!(variables[1]["value"], json!("hello payments"));
    }

    #[test]
    fn test_second_pass_is_a_noop() {
        let (evaluator, validators) = resolver_parts();
        let resolver = DocumentResolver::new(&evaluator, &validators);
        let document = YamlParser::parse(PIPELINE_YAML).unwrap();
        let first = resolver.resolve_document(&document).unwrap();
        let second = resolver.resolve_document(&first.document).unwrap();
        assert!(second.issues.is_empty());
        assert_eq!(second.document, first.document);
    }

    #[test]
    fn test_validation_failure_is_tied_to_fqn() {
        let yaml = r#"
pipeline:
  stages:
    - stage:
        identifier: s1
        variables:
          - name: env
            value: "<+input>.allowedValues(dev,qa)"
"#;
        let (evaluator, validators) = resolver_parts();
        let resolver = DocumentResolver::new(&evaluator, &validators);
        let document = YamlParser::parse(yaml).unwrap();

        let declarations =
            paramflow_parser::runtime_input_declarations(&Tree::from_document(&document));
        assert_eq!(declarations.len(), 1);

        // splice in an out-of-range value, then re-check the declarations
        let merged = paramflow_parser::merge_runtime_inputs(
            &document,
            &json!({"pipeline": {"stages": [{"stage": {"identifier": "s1", "variables": [
                {"name": "env", "value": "prod"}
            ]}}]}}),
        );
        let mut tree = Tree::from_document(&merged);
        resolver.resolve_tree(&mut tree).unwrap();
        let issues = resolver.validate_runtime_inputs(&tree, &declarations);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].fqn, "pipeline.stages.s1.variables.env");
        assert_eq!(
            issues[0].result.expression.as_deref(),
            Some("<+input>.allowedValues(dev,qa)")
        );
    }

    #[test]
    fn test_pending_leaf_does_not_block_siblings() {
        let yaml = r#"
pipeline:
  stages:
    - stage:
        identifier: s1
        variables:
          - name: env
            value: "<+unknown.ref>"
          - name: greeting
            value: "hello <+pipeline.name>"
"#;
        let (evaluator, validators) = resolver_parts();
        let resolver = DocumentResolver::new(&evaluator, &validators);
        let document = YamlParser::parse(yaml).unwrap();
        let resolution = resolver.resolve_document(&document).unwrap();
        let variables = &resolution.document["pipeline"]["stages"][0]["stage"]["variables"];
        assert_eq!(variables[0]["value"], json!("<+unknown.ref>"));
        assert_eq!(variables[1]["value"], json!("hello payments"));
        assert!(resolution.issues.is_empty());
    }
}
