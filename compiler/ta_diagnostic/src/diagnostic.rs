//! Diagnostics: semantic issues in an otherwise valid parse (§4.4).
//!
//! Diagnostics are collected, not thrown: the validator walks the whole
//! tree and returns every issue it finds rather than aborting on the
//! first one, so a single compile attempt surfaces all of them at once.

use std::fmt;
use ta_ir::{Name, Span};

/// Severity level for a diagnostic. Every taxonomy member in §4.4 is an
/// `Error` today; `Warning` exists for forward compatibility with
/// non-fatal lints (e.g. an unreachable `case`) without widening the
/// public enum later.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// The fixed diagnostic taxonomy from §4.4, one variant per named kind.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum DiagnosticKind {
    VariableNotDeclared { name: Name },
    VariableReused { name: Name },
    UnexpectedArrayIndex,
    WrongArrayIndex { expected: Name },
    UnexpectedBreak,
    EmptySwitchBody,
    DuplicatedCaseLabel { label: i64 },
    SwitchLabelNotLiteral,
    MethodNotDeclared { name: Name },
    CallNoReturnExpression { method: Name },
    MethodDoesNotReturnValue { method: Name },
    CallWrongArgsNumber { method: Name, expected: usize, got: usize },
    CallWrongArgsType { param: Name, method: Name, expected_dim: u32, got_dim: u32 },
    UnexpectedCallback { name: Name },
    CallbackParametersMustBeScalars { callback: Name },
    UnexpectedLiteralInDeclaration,
}

impl DiagnosticKind {
    /// Every taxonomy member is a hard error at the interface boundary
    /// (§4.4: "a non-empty list is a compile failure").
    #[must_use]
    pub const fn severity(&self) -> Severity {
        Severity::Error
    }

    /// Stable code, independent of wording, for `--explain`-style lookups
    /// and for deduplicating diagnostics of the same kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::VariableNotDeclared { .. } => "TA001",
            DiagnosticKind::VariableReused { .. } => "TA002",
            DiagnosticKind::UnexpectedArrayIndex => "TA003",
            DiagnosticKind::WrongArrayIndex { .. } => "TA004",
            DiagnosticKind::UnexpectedBreak => "TA005",
            DiagnosticKind::EmptySwitchBody => "TA006",
            DiagnosticKind::DuplicatedCaseLabel { .. } => "TA007",
            DiagnosticKind::SwitchLabelNotLiteral => "TA008",
            DiagnosticKind::MethodNotDeclared { .. } => "TA009",
            DiagnosticKind::CallNoReturnExpression { .. } => "TA010",
            DiagnosticKind::MethodDoesNotReturnValue { .. } => "TA011",
            DiagnosticKind::CallWrongArgsNumber { .. } => "TA012",
            DiagnosticKind::CallWrongArgsType { .. } => "TA013",
            DiagnosticKind::UnexpectedCallback { .. } => "TA014",
            DiagnosticKind::CallbackParametersMustBeScalars { .. } => "TA015",
            DiagnosticKind::UnexpectedLiteralInDeclaration => "TA016",
        }
    }
}

/// One diagnostic: a taxonomy member plus the span it applies to.
///
/// `parseinfo` from the original design becomes a plain `Span`; line and
/// column are derived from it on demand by [`crate::span_utils`] at
/// render time rather than stored redundantly on every diagnostic.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: Span,
}

impl Diagnostic {
    #[must_use]
    pub const fn new(kind: DiagnosticKind, span: Span) -> Self {
        Diagnostic { kind, span }
    }

    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.kind.severity()
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Render this diagnostic's message, resolving any interned names
    /// through `resolve`.
    pub fn message(&self, resolve: impl Fn(Name) -> String) -> String {
        match &self.kind {
            DiagnosticKind::VariableNotDeclared { name } => {
                format!("variable `{}` is not declared", resolve(*name))
            }
            DiagnosticKind::VariableReused { name } => {
                format!("variable `{}` is declared more than once along this path", resolve(*name))
            }
            DiagnosticKind::UnexpectedArrayIndex => "unexpected array index".to_string(),
            DiagnosticKind::WrongArrayIndex { expected } => {
                format!("expected subscript to use loop index `{}`", resolve(*expected))
            }
            DiagnosticKind::UnexpectedBreak => "`break` outside of a loop".to_string(),
            DiagnosticKind::EmptySwitchBody => "`switch` has no cases".to_string(),
            DiagnosticKind::DuplicatedCaseLabel { label } => format!("duplicated case label `{label}`"),
            DiagnosticKind::SwitchLabelNotLiteral => "case label must be an integer literal".to_string(),
            DiagnosticKind::MethodNotDeclared { name } => {
                format!("method `{}` is not declared", resolve(*name))
            }
            DiagnosticKind::CallNoReturnExpression { method } => {
                format!("call to `{}` must bind its return value", resolve(*method))
            }
            DiagnosticKind::MethodDoesNotReturnValue { method } => {
                format!("method `{}` does not return a value", resolve(*method))
            }
            DiagnosticKind::CallWrongArgsNumber { method, expected, got } => {
                format!("`{}` expects {expected} argument(s), got {got}", resolve(*method))
            }
            DiagnosticKind::CallWrongArgsType { param, method, expected_dim, got_dim } => format!(
                "argument `{}` of `{}` expects {expected_dim} dimension(s), got {got_dim}",
                resolve(*param),
                resolve(*method)
            ),
            DiagnosticKind::UnexpectedCallback { name } => {
                format!("callback `{}` is not declared for this method", resolve(*name))
            }
            DiagnosticKind::CallbackParametersMustBeScalars { callback } => {
                format!("parameters of callback `{}` must be scalars", resolve(*callback))
            }
            DiagnosticKind::UnexpectedLiteralInDeclaration => {
                "an integer literal cannot be declared as a reference".to_string()
            }
        }
    }
}
