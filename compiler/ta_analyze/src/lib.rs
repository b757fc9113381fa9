//! Semantic analysis for the TuringArena interface definition language:
//! context threading (§4.2), per-node analysis visitors (§4.3), the
//! validator's diagnostic taxonomy (§4.4), and the block flattener/grouper
//! (§4.5).
//!
//! A [`Program`] coming out of `ta_parse` is syntactically complete but
//! not yet known to be meaningful: [`analyze`] is the single entry point
//! that turns it into an [`AnalyzedProgram`] or a non-empty diagnostic
//! list.

mod analyzer;
mod context;
mod group;
mod synthesize;
mod types;
mod validate;

pub use analyzer::{
    block_first_requests, can_be_grouped, declaration_directions, first_requests, reference_actions,
    relevant_children, variable_allocations,
};
pub use context::{thread_program, ContextTable, StatementContext};
pub use group::{group_program, GroupTable};
pub use synthesize::synthesize_resolution_nodes;
pub use types::{Allocation, FirstRequest, FirstRequestSet, Step};
pub use validate::validate;

use ta_diagnostic::Diagnostic;
use ta_ir::Program;

/// The result of a successful analysis: the source program plus the two
/// side tables later passes (the driver engine) consult.
pub struct AnalyzedProgram {
    pub program: Program,
    pub contexts: ContextTable,
    pub groups: GroupTable,
}

/// Thread contexts, validate, synthesize the driver's internal resolution
/// nodes, and group a parsed program. Returns the diagnostics collected by
/// the validator if any were found; otherwise the analyzed program ready
/// for the driver.
pub fn analyze(mut program: Program) -> Result<AnalyzedProgram, Vec<Diagnostic>> {
    let contexts = thread_program(&program);
    let diagnostics = validate(&program, &contexts);
    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }
    synthesize_resolution_nodes(&mut program, &contexts);
    let groups = group_program(&program);
    Ok(AnalyzedProgram { program, contexts, groups })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ta_ir::DirectionSet;

    fn parse(source: &str) -> Program {
        ta_parse::parse(source).expect("source should parse")
    }

    #[test]
    fn minimal_interface_analyzes_cleanly() {
        let program = parse(
            "function solve(n) -> int;\n\
             main {\n\
             \x20 var n;\n\
             \x20 var r;\n\
             \x20 input n;\n\
             \x20 r = call solve(n);\n\
             \x20 output r;\n\
             }\n",
        );
        let analyzed = analyze(program).expect("should have no diagnostics");
        let steps = analyzed.groups.get(&analyzed.program.interface.main_block).unwrap();
        assert!(!steps.is_empty());
    }

    #[test]
    fn undeclared_variable_is_reported() {
        // `output x;` with no prior `input`/`var` declaration reaching it
        // along the main path: the parser auto-allocates a fresh variable
        // for `x`, so the validator must flag it as never declared.
        let program = parse("main {\n  output x;\n}\n");
        let diagnostics = analyze(program).expect_err("undeclared variable should fail analysis");
        assert!(diagnostics
            .iter()
            .any(|d| matches!(d.kind, ta_diagnostic::DiagnosticKind::VariableNotDeclared { .. })));
    }

    #[test]
    fn break_outside_loop_is_reported() {
        let program = parse("main {\n  break;\n}\n");
        let diagnostics = analyze(program).expect_err("break outside loop should fail analysis");
        assert!(diagnostics.iter().any(|d| matches!(d.kind, ta_diagnostic::DiagnosticKind::UnexpectedBreak)));
    }

    #[test]
    fn break_inside_loop_is_accepted() {
        let program = parse("main {\n  loop {\n    break;\n  }\n}\n");
        analyze(program).expect("break inside loop should analyze cleanly");
    }

    #[test]
    fn undeclared_method_call_is_reported() {
        let program = parse(
            "main {\n\
             \x20 var n;\n\
             \x20 input n;\n\
             \x20 call missing(n);\n\
             }\n",
        );
        let diagnostics = analyze(program).expect_err("undeclared method should fail analysis");
        assert!(diagnostics.iter().any(|d| matches!(d.kind, ta_diagnostic::DiagnosticKind::MethodNotDeclared { .. })));
    }

    #[test]
    fn grouped_steps_never_mix_directions() {
        let program = parse(
            "function solve(a, b) -> int;\n\
             main {\n\
             \x20 var a;\n\
             \x20 var b;\n\
             \x20 var r;\n\
             \x20 input a;\n\
             \x20 input b;\n\
             \x20 r = call solve(a, b);\n\
             \x20 output r;\n\
             }\n",
        );
        let analyzed = analyze(program).expect("should analyze cleanly");
        for steps in analyzed.groups.values() {
            for step in steps {
                if let Step::Group(stmts) = step {
                    let combined = stmts.iter().fold(DirectionSet::EMPTY, |set, &stmt| {
                        set.union(declaration_directions(&analyzed.program, stmt))
                    });
                    assert!(combined.len() <= 1, "a grouped step must not mix directions");
                }
            }
        }
    }
}
