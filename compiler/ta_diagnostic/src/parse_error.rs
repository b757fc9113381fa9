//! `ParseError`: malformed IDL, fatal at compile time (§7).

use ta_ir::Span;

/// A parse failure. Unlike [`crate::Diagnostic`], a `ParseError` aborts
/// compilation immediately — the parser performs no semantic checks and
/// cannot usefully keep going once the grammar itself doesn't match.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("{message} at {span}")]
pub struct ParseError {
    pub span: Span,
    pub message: String,
}

impl ParseError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        ParseError { span, message: message.into() }
    }
}
