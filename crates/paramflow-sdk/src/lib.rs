//! Paramflow SDK
//!
//! High-level API for resolving pipeline YAML parameter documents:
//! parse a template, merge runtime inputs, resolve every deferred field
//! and collect FQN-tagged validation issues in one call.

pub mod builder;
pub mod engine;
pub mod error;

// Re-export main types
pub use builder::ResolutionEngineBuilder;
pub use engine::ResolutionEngine;
pub use error::{Result, SdkError};

// Re-export commonly used types from dependencies
pub use paramflow_core::{InputSetValidator, ParameterField, TargetKind, ValidatorKind};
pub use paramflow_runtime::{
    DocumentResolution, ExpressionEvaluator, MapEvaluator, ResolutionIssue, ValidatorRegistry,
};
