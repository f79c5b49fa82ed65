//! Fully-qualified-name computation
//!
//! Produces a stable dotted path from any node up to a designated root.
//! Array elements are addressed by their own identifying fields rather
//! than numeric index, and purely structural wrapper fields contribute no
//! segment at all, so the same path keeps working when wrappers are
//! inserted for typing reasons.

use crate::tree::{Node, NodeKind, Tree};

/// Segment separator in rendered paths
pub const PATH_SEPARATOR: &str = ".";

/// Semantic root keyword of pipeline documents
pub const PIPELINE_ROOT_FIELD: &str = "pipeline";

/// Field names that exist only for typing/polymorphism and never appear
/// as a path segment
const STRUCTURAL_WRAPPER_FIELDS: [&str; 2] = ["step", "parallel"];

/// Marker appended to segments whose node carries a `strategy` sibling:
/// such a path may be instantiated multiple times at runtime
pub const LOOPED_EXECUTION_SUFFIX: &str = "<+strategy.identifierPostFix>";

/// Ordered path segments from `stop_field_name` (inclusive) down to
/// `node`. When the ancestor chain never produces the stop segment the
/// list degenerates to the full-root path.
pub fn qualified_name_list(node: Node<'_>, stop_field_name: &str) -> Vec<String> {
    collect(node, Some(stop_field_name), false)
}

/// Same as [`qualified_name_list`], with looped-execution markers appended
/// to segments whose node carries a `strategy` sibling
pub fn qualified_name_list_with_looped_suffix(
    node: Node<'_>,
    stop_field_name: &str,
) -> Vec<String> {
    collect(node, Some(stop_field_name), true)
}

/// Dotted path stopping at the document's semantic root keyword
pub fn fully_qualified_name(node: Node<'_>) -> String {
    qualified_name_list(node, PIPELINE_ROOT_FIELD).join(PATH_SEPARATOR)
}

/// Dotted path all the way to the literal document root
pub fn fully_qualified_name_till_root(node: Node<'_>) -> String {
    collect(node, None, false).join(PATH_SEPARATOR)
}

/// Segments of the full path strictly between two named segments
pub fn qualified_name_between(node: Node<'_>, start: &str, end: &str) -> String {
    let list = collect(node, None, false);
    let start_idx = list
        .iter()
        .position(|s| s == start)
        .map(|i| i + 1)
        .unwrap_or(0);
    let end_idx = list.iter().position(|s| s == end).unwrap_or(list.len());
    if start_idx >= end_idx {
        return String::new();
    }
    list[start_idx..end_idx].join(PATH_SEPARATOR)
}

fn collect(node: Node<'_>, stop_field_name: Option<&str>, looped_suffix: bool) -> Vec<String> {
    let Some(parent) = node.parent() else {
        // the root contributes no segment
        return Vec::new();
    };
    let segment = segment_for(node, parent, looped_suffix);
    if segment.is_empty() {
        // unnamed wrapper or unaddressable element: emit nothing, keep walking
        return collect(parent, stop_field_name, looped_suffix);
    }
    if stop_field_name == Some(segment.as_str()) {
        return vec![segment];
    }
    let mut list = collect(parent, stop_field_name, looped_suffix);
    list.push(segment);
    list
}

fn segment_for(node: Node<'_>, parent: Node<'_>, looped_suffix: bool) -> String {
    let base = match parent.parent() {
        // node's parent is itself one element of a sequence
        Some(grand) if grand.kind() == NodeKind::Array => node
            .identifier()
            .or_else(|| parent.name())
            .or_else(|| parent.key())
            .map(str::to_string)
            .unwrap_or_default(),
        _ => matching_field_name(node, parent).unwrap_or_default(),
    };
    if base.is_empty() || STRUCTURAL_WRAPPER_FIELDS.contains(&base.as_str()) {
        return String::new();
    }
    if looped_suffix && node.field("strategy").is_some() {
        return format!("{base}{LOOPED_EXECUTION_SUFFIX}");
    }
    base
}

/// Which of the parent's own fields structurally matches `node`:
/// object/array children match by uuid, scalar leaves by raw content
fn matching_field_name(node: Node<'_>, parent: Node<'_>) -> Option<String> {
    for field in parent.fields() {
        let matches = match node.kind() {
            NodeKind::Scalar => field.node.is_scalar() && field.node.scalar() == node.scalar(),
            _ => field.node.uuid().is_some() && field.node.uuid() == node.uuid(),
        };
        if matches {
            return Some(field.name.to_string());
        }
    }
    None
}

/// Resolve a dotted path back to the deepest uniquely addressable node
pub fn find_by_qualified_name<'a, S: AsRef<str>>(
    tree: &'a Tree,
    segments: &[S],
) -> Option<Node<'a>> {
    let mut current = tree.root();
    for segment in segments {
        current = descend(current, segment.as_ref())?;
    }
    Some(current)
}

fn descend<'a>(node: Node<'a>, segment: &str) -> Option<Node<'a>> {
    match node.kind() {
        NodeKind::Object => {
            if let Some(field) = node.field(segment) {
                return Some(field.node);
            }
            // wrappers are transparent on the way down too
            for wrapper in STRUCTURAL_WRAPPER_FIELDS {
                if let Some(field) = node.field(wrapper) {
                    if let Some(found) = descend(field.node, segment) {
                        return Some(found);
                    }
                }
            }
            None
        }
        NodeKind::Array => {
            for element in node.as_array() {
                if element.array_unique_identifier() == Some(segment) {
                    return Some(element);
                }
                // an element may wrap a single identified object, e.g. {stage: {...}}
                for field in element.fields() {
                    if field.node.identifier() == Some(segment) {
                        return Some(field.node);
                    }
                }
                // wrapper elements like {parallel: [...]} are transparent
                for field in element.fields() {
                    if STRUCTURAL_WRAPPER_FIELDS.contains(&field.name) {
                        if let Some(found) = descend(field.node, segment) {
                            return Some(found);
                        }
                    }
                }
            }
            None
        }
        NodeKind::Scalar => None,
    }
}
