//! Context Threader (§4.2): walks the tree top-down, building for every
//! block the list of its relevant children paired with the
//! [`StatementContext`] each child sees.

use rustc_hash::FxHashMap;
use ta_ir::{BlockId, Program, ReferenceAction, StmtId, StmtKind, VariableId};

use crate::analyzer::{reference_actions, relevant_children};

/// What a node can observe about the statements that ran before it along
/// its path: the reference actions accumulated from prior siblings (and,
/// transitively, enclosing blocks), the loop indexes currently in scope,
/// and whether a loop encloses this point at all (relevant to `Break`
/// validation).
#[derive(Clone, Debug, Default)]
pub struct StatementContext {
    pub prev_reference_actions: Vec<ReferenceAction>,
    pub index_variables: Vec<VariableId>,
    pub in_loop: bool,
}

/// Every block in the program, mapped to its relevant children paired
/// with the context each one sees on entry.
pub type ContextTable = FxHashMap<BlockId, Vec<(StmtId, StatementContext)>>;

#[must_use]
pub fn thread_program(program: &Program) -> ContextTable {
    let mut table = ContextTable::default();
    thread_block(program, program.interface.main_block, &StatementContext::default(), &mut table);
    table
}

fn thread_block(
    program: &Program,
    block: BlockId,
    parent: &StatementContext,
    table: &mut ContextTable,
) {
    let mut ctx = parent.clone();
    let mut entries = Vec::new();

    for stmt in relevant_children(program, block) {
        entries.push((stmt, ctx.clone()));

        match &program.stmts.get(stmt).kind {
            StmtKind::For { index, body, .. } => {
                let mut child_ctx = ctx.clone();
                child_ctx.index_variables.push(*index);
                child_ctx.in_loop = true;
                thread_block(program, *body, &child_ctx, table);
            }
            StmtKind::Loop { body } => {
                let mut child_ctx = ctx.clone();
                child_ctx.in_loop = true;
                thread_block(program, *body, &child_ctx, table);
            }
            StmtKind::If { then_block, else_block, .. } => {
                thread_block(program, *then_block, &ctx, table);
                if let Some(else_block) = else_block {
                    thread_block(program, *else_block, &ctx, table);
                }
            }
            StmtKind::Switch { cases, .. } => {
                for case in cases {
                    thread_block(program, case.body, &ctx, table);
                }
            }
            StmtKind::CallbackImplementation { body } => {
                // A fresh context parented by the enclosing global: a
                // callback body doesn't see the caller's prior actions,
                // since it may run an arbitrary number of times in an
                // order the evaluator doesn't control.
                thread_block(program, *body, &StatementContext::default(), table);
            }
            _ => {}
        }

        ctx.prev_reference_actions.extend(reference_actions(program, stmt));
    }

    table.insert(block, entries);
}
