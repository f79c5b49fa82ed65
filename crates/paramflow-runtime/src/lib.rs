//! Paramflow Runtime - Expression resolution over parameter fields
//!
//! This crate drives resolution of deferred parameter fields against an
//! injected expression evaluator:
//! - `evaluator`: the evaluator capability and an in-process implementation
//! - `validators`: input-set validator checks and their registry
//! - `processor`: the per-field resolution algorithm
//! - `document`: whole-document resolution with FQN-tagged diagnostics

pub mod document;
pub mod error;
pub mod evaluator;
pub mod processor;
pub mod validators;

// Re-export main types
pub use document::{DocumentResolution, DocumentResolver, ResolutionIssue};
pub use error::{Result, RuntimeError};
pub use evaluator::{ExpressionEvaluator, MapEvaluator};
pub use processor::{FieldProcessor, ProcessorResult};
pub use validators::{
    AllowedValuesCheck, DefaultCheck, RegexCheck, ValidationOutcome, ValidatorCheck,
    ValidatorRegistry,
};
