//! Validator (§4.4): walks the whole tree and collects every diagnostic
//! it finds rather than aborting on the first one.

use rustc_hash::FxHashSet;
use ta_diagnostic::{Diagnostic, DiagnosticKind};
use ta_ir::{ExprKind, Program, Reference, ReferenceAction, StmtId, StmtKind};

use crate::analyzer::reference_actions;
use crate::context::{ContextTable, StatementContext};

#[must_use]
pub fn validate(program: &Program, contexts: &ContextTable) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for entries in contexts.values() {
        for (stmt, ctx) in entries {
            validate_stmt(program, *stmt, ctx, &mut diagnostics);
        }
    }
    diagnostics
}

fn declared_set(ctx: &StatementContext) -> FxHashSet<Reference> {
    ctx.prev_reference_actions
        .iter()
        .filter_map(|action| match action {
            ReferenceAction::Declaration { reference, .. } => Some(*reference),
            ReferenceAction::Resolution { .. } => None,
        })
        .collect()
}

fn validate_stmt(program: &Program, stmt: StmtId, ctx: &StatementContext, out: &mut Vec<Diagnostic>) {
    let declared = declared_set(ctx);
    let node = program.stmts.get(stmt);
    let span = node.span;

    for action in reference_actions(program, stmt) {
        match action {
            ReferenceAction::Resolution { reference } => {
                if !declared.contains(&reference) {
                    let name = program.variables.get(reference.variable).name;
                    out.push(Diagnostic::new(DiagnosticKind::VariableNotDeclared { name }, span));
                }
            }
            ReferenceAction::Declaration { reference, .. } => {
                if declared.contains(&reference) {
                    let name = program.variables.get(reference.variable).name;
                    out.push(Diagnostic::new(DiagnosticKind::VariableReused { name }, span));
                }
            }
        }
    }

    match &node.kind {
        StmtKind::Break => {
            if !ctx.in_loop {
                out.push(Diagnostic::new(DiagnosticKind::UnexpectedBreak, span));
            }
        }
        StmtKind::Read { args } | StmtKind::Write { args } => {
            validate_subscripts(program, args, ctx, out);
        }
        StmtKind::Switch { cases, .. } => {
            if cases.is_empty() {
                out.push(Diagnostic::new(DiagnosticKind::EmptySwitchBody, span));
            }
            let mut seen_labels = FxHashSet::default();
            for case in cases {
                for label in &case.labels {
                    match label {
                        Some(value) => {
                            if !seen_labels.insert(*value) {
                                out.push(Diagnostic::new(
                                    DiagnosticKind::DuplicatedCaseLabel { label: *value },
                                    case.labels_span,
                                ));
                            }
                        }
                        None => out
                            .push(Diagnostic::new(DiagnosticKind::SwitchLabelNotLiteral, case.labels_span)),
                    }
                }
            }
        }
        StmtKind::CallbackStart { callback, params } => {
            if program.interface.find_callback(*callback).is_none() {
                out.push(Diagnostic::new(DiagnosticKind::UnexpectedCallback { name: *callback }, span));
            }
            if params.iter().any(|&p| program.variables.get(p).dimensions > 0) {
                out.push(Diagnostic::new(
                    DiagnosticKind::CallbackParametersMustBeScalars { callback: *callback },
                    span,
                ));
            }
        }
        StmtKind::Call { method, args, return_value } => {
            validate_call(program, *method, args, *return_value, span, out);
        }
        _ => {}
    }
}

fn validate_subscripts(
    program: &Program,
    args: &[ta_ir::ExprId],
    ctx: &StatementContext,
    out: &mut Vec<Diagnostic>,
) {
    for &expr in args {
        if matches!(program.exprs.get(expr).kind, ExprKind::IntLiteral(_)) {
            out.push(Diagnostic::new(DiagnosticKind::UnexpectedLiteralInDeclaration, program.exprs.get(expr).span));
            continue;
        }
        validate_subscript_chain(program, expr, ctx, 0, out);
    }
}

/// Walks a (possibly nested) subscript chain outermost-first, validating
/// each `array[index]` hop against the enclosing loop index at the
/// correspondingly offset nesting depth — `v[i][j]` checks `index` against
/// the innermost loop at depth 0 and `j` against the next loop out at
/// depth 1, mirroring how `Reference::lift`/`subscripted` count
/// `index_count` from the outermost axis.
fn validate_subscript_chain(
    program: &Program,
    expr: ta_ir::ExprId,
    ctx: &StatementContext,
    depth: usize,
    out: &mut Vec<Diagnostic>,
) {
    let ExprKind::Subscript { array, index } = &program.exprs.get(expr).kind else {
        return;
    };
    if program.exprs.dimensions(*array, &program.variables) == 0 {
        out.push(Diagnostic::new(DiagnosticKind::UnexpectedArrayIndex, program.exprs.get(expr).span));
        return;
    }
    if let Some(&expected) = ctx.index_variables.iter().rev().nth(depth) {
        if let ExprKind::VariableReference(used) = program.exprs.get(*index).kind {
            if used != expected && ctx.in_loop {
                out.push(Diagnostic::new(
                    DiagnosticKind::WrongArrayIndex { expected: program.variables.get(expected).name },
                    program.exprs.get(*index).span,
                ));
            }
        }
    }
    validate_subscript_chain(program, *array, ctx, depth + 1, out);
}

fn validate_call(
    program: &Program,
    method: ta_ir::Name,
    args: &[ta_ir::ExprId],
    return_value: Option<ta_ir::ExprId>,
    span: ta_ir::Span,
    out: &mut Vec<Diagnostic>,
) {
    let Some(prototype) = program.interface.find_method(method) else {
        out.push(Diagnostic::new(DiagnosticKind::MethodNotDeclared { name: method }, span));
        return;
    };

    if args.len() != prototype.parameters.len() {
        out.push(Diagnostic::new(
            DiagnosticKind::CallWrongArgsNumber {
                method,
                expected: prototype.parameters.len(),
                got: args.len(),
            },
            span,
        ));
    } else {
        for (&arg, &param) in args.iter().zip(prototype.parameters.iter()) {
            let expected_dim = program.variables.get(param).dimensions;
            let got_dim = program.exprs.dimensions(arg, &program.variables);
            if expected_dim != got_dim {
                out.push(Diagnostic::new(
                    DiagnosticKind::CallWrongArgsType {
                        param: program.variables.get(param).name,
                        method,
                        expected_dim,
                        got_dim,
                    },
                    program.exprs.get(arg).span,
                ));
            }
        }
    }

    match (return_value, prototype.has_return_value) {
        (None, true) => out.push(Diagnostic::new(DiagnosticKind::CallNoReturnExpression { method }, span)),
        (Some(_), false) => {
            out.push(Diagnostic::new(DiagnosticKind::MethodDoesNotReturnValue { method }, span));
        }
        _ => {}
    }

    if let Some(expr) = return_value {
        if matches!(program.exprs.get(expr).kind, ExprKind::IntLiteral(_)) {
            out.push(Diagnostic::new(
                DiagnosticKind::UnexpectedLiteralInDeclaration,
                program.exprs.get(expr).span,
            ));
        }
    }
}
