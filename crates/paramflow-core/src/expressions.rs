//! `<+...>` expression syntax helpers
//!
//! The expression grammar itself belongs to an injected evaluator
//! capability; this module only recognizes the delimiters and the
//! runtime-input method suffixes (`allowedValues`, `regex`, `default`).

use crate::types::validator::{InputSetValidator, ValidatorKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// Opening delimiter of an expression token
pub const EXPRESSION_PREFIX: &str = "<+";

/// Closing delimiter of an expression token
pub const EXPRESSION_SUFFIX: &str = ">";

/// Placeholder for a value deliberately left to be supplied at execution time
pub const RUNTIME_INPUT_MARKER: &str = "<+input>";

static EXPRESSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<\+[^<>]*>").expect("expression pattern compiles"));

/// True if the text contains at least one `<+...>` token
pub fn has_expression(text: &str) -> bool {
    EXPRESSION_PATTERN.is_match(text)
}

/// True if the whole text is exactly one `<+...>` token
pub fn is_single_expression(text: &str) -> bool {
    let trimmed = text.trim();
    match EXPRESSION_PATTERN.find(trimmed) {
        Some(m) => m.start() == 0 && m.end() == trimmed.len(),
        None => false,
    }
}

/// True if the text starts with the `<+input>` placeholder
pub fn is_runtime_input(text: &str) -> bool {
    text.trim().starts_with(RUNTIME_INPUT_MARKER)
}

/// Inner text of the token when the whole text is one `<+...>` token
pub fn single_expression_inner(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if !is_single_expression(trimmed) {
        return None;
    }
    Some(&trimmed[EXPRESSION_PREFIX.len()..trimmed.len() - EXPRESSION_SUFFIX.len()])
}

/// Replace each `<+...>` token using `substitute`, which receives the
/// inner expression text and returns `None` to keep the token verbatim
pub fn replace_expressions<F>(text: &str, mut substitute: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    EXPRESSION_PATTERN
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let token = &caps[0];
            let inner = &token[EXPRESSION_PREFIX.len()..token.len() - EXPRESSION_SUFFIX.len()];
            substitute(inner).unwrap_or_else(|| token.to_string())
        })
        .into_owned()
}

/// A runtime-input declaration parsed from a leaf value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInput {
    /// Constraint to check once a concrete value is supplied
    pub validator: Option<InputSetValidator>,
    /// Value to use when no input is supplied
    pub default: Option<String>,
}

/// Parse a runtime-input declaration such as
/// `<+input>.default(qa).allowedValues(qa,prod)`.
///
/// Returns `None` when the text is not a runtime input or carries an
/// unknown method suffix: a typo in a validator name must not silently
/// produce an unvalidated input.
pub fn parse_runtime_input(text: &str) -> Option<RuntimeInput> {
    let trimmed = text.trim();
    let rest = trimmed.strip_prefix(RUNTIME_INPUT_MARKER)?;

    let mut input = RuntimeInput {
        validator: None,
        default: None,
    };

    let mut rest = rest;
    while !rest.is_empty() {
        rest = rest.strip_prefix('.')?;
        let open = rest.find('(')?;
        let method = &rest[..open];
        let args_end = matching_paren(&rest[open..])?;
        let args = &rest[open + 1..open + args_end];
        match method {
            "allowedValues" => {
                input.validator = Some(InputSetValidator::new(ValidatorKind::AllowedValues, args));
            }
            "regex" => {
                input.validator = Some(InputSetValidator::new(ValidatorKind::Regex, args));
            }
            "default" => {
                input.default = Some(args.to_string());
            }
            _ => return None,
        }
        rest = &rest[open + args_end + 1..];
    }

    Some(input)
}

/// Offset of the `)` that closes the `(` at the start of `text`,
/// relative to that opening paren. Handles nested parentheses so regex
/// parameters like `^(a|b)$` survive.
fn matching_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset);
                }
            }
            _ => {}
        }
    }
    None
}
