//! Declared coercion targets for parameter fields
//!
//! The target kind of a field is fixed at schema-definition time as a
//! closed enum; coercion is an exhaustive match over these kinds rather
//! than dynamic dispatch on runtime type information.

use serde::{Deserialize, Serialize};

/// Declared target kind of a parameter field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Declared string; expressions render as templates, values never coerce
    Text,
    /// Integer; strings parse base-10, fractional numbers truncate
    Int,
    /// Float; strings parse as decimal, integers widen
    Float,
    /// Boolean; strings parse case-insensitively, soft-fail otherwise
    Bool,
    /// Enum declared at schema-definition time
    Enum(EnumSpec),
    /// Domain timeout type with its own string grammar
    Duration,
    /// No declared scalar type; values pass through untouched
    Opaque,
}

impl TargetKind {
    /// Whether expressions for this kind render as string templates
    pub fn is_text(&self) -> bool {
        matches!(self, TargetKind::Text)
    }

    /// Short name used in coercion diagnostics
    pub fn describe(&self) -> &str {
        match self {
            TargetKind::Text => "text",
            TargetKind::Int => "integer",
            TargetKind::Float => "float",
            TargetKind::Bool => "boolean",
            TargetKind::Enum(spec) => &spec.name,
            TargetKind::Duration => "duration",
            TargetKind::Opaque => "opaque",
        }
    }
}

/// Enum target declared at schema-definition time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumSpec {
    /// Name of the enum, used in diagnostics
    pub name: String,
    /// Declared constants in declaration order
    pub constants: Vec<EnumConstant>,
}

/// One declared enum constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumConstant {
    pub name: String,
    /// Custom string representation, when it differs from the constant name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repr: Option<String>,
}

impl EnumSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constants: Vec::new(),
        }
    }

    /// Add a constant with no custom representation
    pub fn constant(mut self, name: impl Into<String>) -> Self {
        self.constants.push(EnumConstant {
            name: name.into(),
            repr: None,
        });
        self
    }

    /// Add a constant with a custom string representation
    pub fn constant_with_repr(mut self, name: impl Into<String>, repr: impl Into<String>) -> Self {
        self.constants.push(EnumConstant {
            name: name.into(),
            repr: Some(repr.into()),
        });
        self
    }

    /// Match free text against constant names or custom representations,
    /// both case-insensitive
    pub fn match_text(&self, text: &str) -> Option<&EnumConstant> {
        self.constants.iter().find(|c| {
            c.name.eq_ignore_ascii_case(text)
                || c.repr
                    .as_deref()
                    .is_some_and(|r| r.eq_ignore_ascii_case(text))
        })
    }
}

/// Maps a Rust value type to its declared coercion target.
///
/// Used by `ParameterField` deserialization so that string-declared fields
/// render as templates while everything else evaluates as objects.
pub trait TargetTyped {
    fn target_kind() -> TargetKind;
}

impl TargetTyped for String {
    fn target_kind() -> TargetKind {
        TargetKind::Text
    }
}

impl TargetTyped for bool {
    fn target_kind() -> TargetKind {
        TargetKind::Bool
    }
}

impl TargetTyped for i32 {
    fn target_kind() -> TargetKind {
        TargetKind::Int
    }
}

impl TargetTyped for i64 {
    fn target_kind() -> TargetKind {
        TargetKind::Int
    }
}

impl TargetTyped for u32 {
    fn target_kind() -> TargetKind {
        TargetKind::Int
    }
}

impl TargetTyped for f32 {
    fn target_kind() -> TargetKind {
        TargetKind::Float
    }
}

impl TargetTyped for f64 {
    fn target_kind() -> TargetKind {
        TargetKind::Float
    }
}

impl TargetTyped for serde_json::Value {
    fn target_kind() -> TargetKind {
        TargetKind::Opaque
    }
}
