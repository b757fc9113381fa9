//! The rest of the §7 error taxonomy: `CompileError`, `InterfaceError`,
//! `AlgorithmRuntimeError`, `ProtocolError`.

use crate::{Diagnostic, ParseError};

/// Failure to compile an IDL source into an [`ta_ir::Program`]: either the
/// grammar didn't match (`ParseError`), or it parsed but the validator
/// collected one or more semantic diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("{} diagnostic(s) reported", .0.len())]
    Diagnostics(Vec<Diagnostic>),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// The interface declares a forbidden shape, discovered while lowering a
/// validated AST into the driver's executable form (e.g. after validation
/// passed but arity/shape bookkeeping still finds something impossible to
/// execute). Distinct from `Diagnostic` because it is raised during
/// compilation of a structurally *valid* tree, not collected from the
/// validator's node walk.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ProtocolError {
    #[error("callback `{callback}` has a non-scalar return type")]
    NonScalarCallbackReturn { callback: String },
    #[error("method `{method}` has a non-scalar return type")]
    NonScalarMethodReturn { method: String },
}

/// A runtime protocol violation detected by the driver: fatal to the
/// current evaluation, surfaced to the evaluator (§7).
#[derive(Debug, thiserror::Error)]
pub enum InterfaceError {
    #[error("no case matches in switch (value {value})")]
    NoMatchingCase { value: i64 },
    #[error("unexpected request from solution: expected one of {expected:?}, got {got}")]
    UnexpectedRequest { expected: Vec<String>, got: String },
    #[error("call to `{method}` was sent with {expected} argument(s) but the solution reported {got}")]
    CallArityMismatch { method: String, expected: usize, got: usize },
    #[error("malformed wire message: {0}")]
    MalformedMessage(String),
    #[error("solution raised undeclared callback `{name}`")]
    UnknownCallback { name: String },
    #[error("I/O error talking to solution: {0}")]
    Io(String),
}

/// A sandbox-side failure: timeout, crash, or disallowed syscall. Fatal to
/// the evaluation. The sandbox itself (seccomp, cgroups, process
/// isolation) is an external collaborator; this variant is what the
/// driver surfaces once that collaborator reports back.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum AlgorithmRuntimeError {
    #[error("solution exceeded its time limit")]
    TimeLimitExceeded,
    #[error("solution process exited unexpectedly (status: {status})")]
    UnexpectedExit { status: i32 },
    #[error("solution crashed: {reason}")]
    Crashed { reason: String },
}
