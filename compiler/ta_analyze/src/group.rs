//! Block Flattener / Grouper (§4.5): turns a block's relevant children
//! into a sequence alternating groupable [`Step`]s and non-groupable
//! singletons.

use rustc_hash::FxHashMap;
use ta_ir::{BlockId, DirectionSet, Program, StmtKind};

use crate::analyzer::{can_be_grouped, declaration_directions, relevant_children};
use crate::types::Step;

pub type GroupTable = FxHashMap<BlockId, Vec<Step>>;

#[must_use]
pub fn group_program(program: &Program) -> GroupTable {
    let mut table = GroupTable::default();
    group_block_recursive(program, program.interface.main_block, &mut table);
    table
}

fn group_block_recursive(program: &Program, block: BlockId, table: &mut GroupTable) {
    table.insert(block, group_block(program, block));

    for stmt in relevant_children(program, block) {
        match &program.stmts.get(stmt).kind {
            StmtKind::For { body, .. } | StmtKind::Loop { body } | StmtKind::CallbackImplementation { body } => {
                group_block_recursive(program, *body, table);
            }
            StmtKind::If { then_block, else_block, .. } => {
                group_block_recursive(program, *then_block, table);
                if let Some(else_block) = else_block {
                    group_block_recursive(program, *else_block, table);
                }
            }
            StmtKind::Switch { cases, .. } => {
                for case in cases {
                    group_block_recursive(program, case.body, table);
                }
            }
            _ => {}
        }
    }
}

/// One block's worth of the §4.5 algorithm.
fn group_block(program: &Program, block: BlockId) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut group: Vec<ta_ir::StmtId> = Vec::new();
    let mut group_directions = DirectionSet::EMPTY;

    for stmt in relevant_children(program, block) {
        if can_be_grouped(program, stmt) {
            let combined = group_directions.union(declaration_directions(program, stmt));
            if combined.len() <= 1 {
                group.push(stmt);
                group_directions = combined;
                continue;
            }
        }

        if !group.is_empty() {
            steps.push(Step::Group(std::mem::take(&mut group)));
            group_directions = DirectionSet::EMPTY;
        }

        if can_be_grouped(program, stmt) {
            group_directions = declaration_directions(program, stmt);
            group.push(stmt);
        } else {
            steps.push(Step::Singleton(stmt));
        }
    }

    if !group.is_empty() {
        steps.push(Step::Group(group));
    }

    steps
}
