//! Resolution-node synthesis (§4.6): splices the internal `*Resolve` and
//! `AcceptCallbacks` markers into the tree ahead of the constructs they
//! guard, once threading has confirmed the program is well-formed and
//! before the block flattener groups it.
//!
//! Grounded on the same "fold over children, rebuild the sequence" shape
//! as `group.rs`'s `group_block`, but rebuilding a block's own `stmts`
//! list in place rather than producing a side table.

use ta_ir::{Program, StmtKind};

use crate::context::ContextTable;

/// Walks every block the context threader visited, rebuilding its
/// statement list with a `CallArgumentsResolve`/`AcceptCallbacks` pair
/// wrapped around every `Call`, and a `SwitchValueResolve`/
/// `IfConditionResolve` immediately ahead of every `Switch`/`If`.
///
/// Each block is rebuilt independently: `contexts` already has one entry
/// per block reachable from `main`, including every `For`/`Loop`/`If`/
/// `Switch`/`CallbackImplementation` body, so splicing block-by-block
/// reaches the whole tree without needing its own recursion.
pub fn synthesize_resolution_nodes(program: &mut Program, contexts: &ContextTable) {
    let blocks: Vec<_> = contexts.keys().copied().collect();
    for block in blocks {
        let original = program.blocks.get(block).stmts.clone();
        let mut rebuilt = Vec::with_capacity(original.len());
        for stmt in original {
            let kind = program.stmts.get(stmt).kind.clone();
            let span = program.stmts.get(stmt).span;
            match kind {
                StmtKind::Call { method, args, .. } => {
                    let resolve = program.stmts.alloc(StmtKind::CallArgumentsResolve { args: args.clone() }, span);
                    rebuilt.push(resolve);
                    rebuilt.push(stmt);
                    let callbacks = program
                        .interface
                        .find_method(method)
                        .map(|prototype| prototype.callbacks.iter().map(|cb| cb.name).collect())
                        .unwrap_or_default();
                    let accept = program.stmts.alloc(StmtKind::AcceptCallbacks { callbacks }, span);
                    rebuilt.push(accept);
                }
                StmtKind::Switch { value, .. } => {
                    let resolve = program.stmts.alloc(StmtKind::SwitchValueResolve { value }, span);
                    rebuilt.push(resolve);
                    rebuilt.push(stmt);
                }
                StmtKind::If { cond, .. } => {
                    let resolve = program.stmts.alloc(StmtKind::IfConditionResolve { cond }, span);
                    rebuilt.push(resolve);
                    rebuilt.push(stmt);
                }
                _ => rebuilt.push(stmt),
            }
        }
        program.blocks.get_mut(block).stmts = rebuilt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::thread_program;

    fn parse(source: &str) -> Program {
        ta_parse::parse(source).expect("source should parse")
    }

    #[test]
    fn wraps_every_call_with_resolve_and_accept_callbacks() {
        let mut program = parse(
            "function solve(n) -> int;\n\
             main {\n\
             \x20 var n;\n\
             \x20 var r;\n\
             \x20 input n;\n\
             \x20 r = call solve(n);\n\
             \x20 output r;\n\
             }\n",
        );
        let contexts = thread_program(&program);
        synthesize_resolution_nodes(&mut program, &contexts);

        let stmts = &program.blocks.get(program.interface.main_block).stmts;
        let kinds: Vec<&str> = stmts
            .iter()
            .map(|&id| match &program.stmts.get(id).kind {
                StmtKind::Read { .. } => "read",
                StmtKind::CallArgumentsResolve { .. } => "resolve_args",
                StmtKind::Call { .. } => "call",
                StmtKind::AcceptCallbacks { .. } => "accept_callbacks",
                StmtKind::Write { .. } => "write",
                other => panic!("unexpected statement kind {other:?}"),
            })
            .collect();
        assert_eq!(kinds, vec!["read", "resolve_args", "call", "accept_callbacks", "write"]);
    }

    #[test]
    fn switch_and_if_get_a_resolve_node_immediately_before_them() {
        let mut program = parse(
            "main {\n\
             \x20 var k;\n\
             \x20 input k;\n\
             \x20 switch k {\n\
             \x20   case 1: output k;\n\
             \x20 }\n\
             \x20 if k {\n\
             \x20   output k;\n\
             \x20 }\n\
             }\n",
        );
        let contexts = thread_program(&program);
        synthesize_resolution_nodes(&mut program, &contexts);

        let stmts = &program.blocks.get(program.interface.main_block).stmts;
        let kinds: Vec<&str> = stmts
            .iter()
            .map(|&id| match &program.stmts.get(id).kind {
                StmtKind::Read { .. } => "read",
                StmtKind::SwitchValueResolve { .. } => "resolve_switch",
                StmtKind::Switch { .. } => "switch",
                StmtKind::IfConditionResolve { .. } => "resolve_if",
                StmtKind::If { .. } => "if",
                other => panic!("unexpected statement kind {other:?}"),
            })
            .collect();
        assert_eq!(kinds, vec!["read", "resolve_switch", "switch", "resolve_if", "if"]);
    }
}
