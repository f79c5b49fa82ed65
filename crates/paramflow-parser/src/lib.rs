//! Paramflow Parser - YAML boundary, node tree and addressing
//!
//! This crate turns YAML text into an identity-stable tree of addressable
//! nodes:
//! - `yaml`: parse boundary producing a generic document value
//! - `tree`: arena-backed node tree with parent-aware navigation
//! - `fqn`: fully-qualified-name computation and reverse lookup
//! - `inject`: structural identity tagging for diff/merge
//! - `merge`: splicing runtime inputs back into a template

pub mod error;
pub mod fqn;
pub mod inject;
pub mod merge;
pub mod tree;
pub mod yaml;

// Re-export main types
pub use error::{ParseError, Result};
pub use inject::{inject_uuids, inject_uuids_with_leaf_ids, UUID_FIELD_NAME};
pub use merge::{merge_runtime_inputs, runtime_input_declarations, RuntimeInputDeclaration};
pub use tree::{Field, Node, NodeId, NodeKind, Tree};
pub use yaml::YamlParser;
