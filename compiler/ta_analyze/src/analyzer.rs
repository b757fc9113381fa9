//! Per-node visitors (§4.3): `reference_actions`, `declaration_directions`,
//! `first_requests`, `can_be_grouped`, `variable_allocations`.
//!
//! Each visitor is a pure function of the program's arenas — none of them
//! need the threaded [`crate::context::StatementContext`], which only the
//! validator consults to decide whether a given action is legal *at this
//! point on this path*.

use ta_ir::{is_relevant, BlockId, Direction, DirectionSet, Program, Reference, ReferenceAction, StmtId, StmtKind};

use crate::types::{Allocation, FirstRequest, FirstRequestSet};

/// Children of `block` that the driver actually executes: skeleton
/// artefacts (`is_relevant` false) are dropped, matching §4.2 step 2.
pub fn relevant_children(program: &Program, block: BlockId) -> Vec<StmtId> {
    program
        .blocks
        .get(block)
        .stmts
        .iter()
        .copied()
        .filter(|&id| is_relevant(&program.stmts.get(id).kind))
        .collect()
}

/// The ordered sequence of `Declaration`/`Resolution` actions `stmt`
/// introduces at its own level (§4.3 `reference_actions`).
pub fn reference_actions(program: &Program, stmt: StmtId) -> Vec<ReferenceAction> {
    match &program.stmts.get(stmt).kind {
        StmtKind::Read { args } => args
            .iter()
            .filter_map(|&expr| reference_of(program, expr))
            .map(|(reference, dimensions)| ReferenceAction::Declaration { reference, dimensions })
            .collect(),
        StmtKind::Write { args } => args
            .iter()
            .filter_map(|&expr| reference_of(program, expr))
            .map(|(reference, _)| ReferenceAction::Resolution { reference })
            .collect(),
        StmtKind::Call { args, return_value, .. } => {
            let mut actions: Vec<ReferenceAction> = args
                .iter()
                .filter_map(|&expr| reference_of(program, expr))
                .map(|(reference, _)| ReferenceAction::Resolution { reference })
                .collect();
            if let Some(expr) = return_value {
                if let Some((reference, dimensions)) = reference_of(program, *expr) {
                    actions.push(ReferenceAction::Declaration { reference, dimensions });
                }
            }
            actions
        }
        StmtKind::CallbackStart { params, .. } => params
            .iter()
            .map(|&variable| ReferenceAction::Declaration {
                reference: Reference::whole(variable),
                dimensions: 0,
            })
            .collect(),
        StmtKind::Return { value: Some(expr) } => reference_of(program, *expr)
            .map(|(reference, _)| vec![ReferenceAction::Resolution { reference }])
            .unwrap_or_default(),
        StmtKind::CallbackImplementation { body } => sequence_actions(program, *body),
        StmtKind::For { body, .. } => {
            // Lift the body's actions out one subscript level; actions that
            // would go negative are local to this iteration of the loop and
            // do not escape it (§4.3).
            sequence_actions(program, *body)
                .into_iter()
                .filter_map(ReferenceAction::lift)
                .collect()
        }
        StmtKind::If { then_block, else_block, .. } => {
            let mut actions = sequence_actions(program, *then_block);
            if let Some(else_block) = else_block {
                actions.extend(sequence_actions(program, *else_block));
            }
            actions
        }
        StmtKind::Switch { cases, .. } => {
            // An existential merge: downstream code must not assume any
            // one case's action is guaranteed to have happened.
            let mut actions = Vec::new();
            for case in cases {
                for action in sequence_actions(program, case.body) {
                    if !actions.iter().any(|existing| references_match(existing, &action)) {
                        actions.push(action);
                    }
                }
            }
            actions
        }
        StmtKind::Loop { body } => sequence_actions(program, *body),
        _ => Vec::new(),
    }
}

fn references_match(a: &ReferenceAction, b: &ReferenceAction) -> bool {
    a.reference() == b.reference()
}

fn sequence_actions(program: &Program, block: BlockId) -> Vec<ReferenceAction> {
    relevant_children(program, block)
        .into_iter()
        .flat_map(|stmt| reference_actions(program, stmt))
        .collect()
}

fn reference_of(program: &Program, expr: ta_ir::ExprId) -> Option<(Reference, u32)> {
    program.exprs.base_variable(expr).map(|(variable, index_count)| {
        let declared_dimensions = program.variables.get(variable).dimensions;
        let dimensions = declared_dimensions.saturating_sub(index_count);
        (Reference { variable, index_count }, dimensions)
    })
}

/// The set of wire directions `stmt` touches (§4.3 `declaration_directions`).
/// `Read` is downward (the evaluator sends a value toward the solution);
/// `Write` is upward (the solution sends a value toward the evaluator);
/// everything that moves data follows the same rule transitively.
pub fn declaration_directions(program: &Program, stmt: StmtId) -> DirectionSet {
    match &program.stmts.get(stmt).kind {
        StmtKind::Read { .. } => DirectionSet::single(Direction::Downward),
        StmtKind::Write { .. } | StmtKind::Checkpoint | StmtKind::CallbackStart { .. } => {
            DirectionSet::single(Direction::Upward)
        }
        StmtKind::Return { .. } => DirectionSet::single(Direction::Upward),
        StmtKind::Call { return_value, .. } => {
            let mut set = DirectionSet::single(Direction::Downward);
            if return_value.is_some() {
                set = set.union(DirectionSet::single(Direction::Upward));
            }
            set
        }
        StmtKind::CallbackImplementation { body } => block_directions(program, *body),
        StmtKind::For { body, .. } | StmtKind::Loop { body } => block_directions(program, *body),
        StmtKind::If { then_block, else_block, .. } => {
            let mut set = block_directions(program, *then_block);
            if let Some(else_block) = else_block {
                set = set.union(block_directions(program, *else_block));
            }
            set
        }
        StmtKind::Switch { cases, .. } => cases
            .iter()
            .fold(DirectionSet::EMPTY, |set, case| set.union(block_directions(program, case.body))),
        _ => DirectionSet::EMPTY,
    }
}

fn block_directions(program: &Program, block: BlockId) -> DirectionSet {
    relevant_children(program, block)
        .into_iter()
        .fold(DirectionSet::EMPTY, |set, stmt| set.union(declaration_directions(program, stmt)))
}

/// The set of wire requests `stmt` may see first (§4.3 `first_requests`).
pub fn first_requests(program: &Program, stmt: StmtId) -> FirstRequestSet {
    match &program.stmts.get(stmt).kind {
        StmtKind::Exit => FirstRequestSet::single(FirstRequest::Exit),
        StmtKind::Call { method, .. } => FirstRequestSet::single(FirstRequest::Call(*method)),
        StmtKind::For { body, .. } | StmtKind::Loop { body } => {
            let mut set = FirstRequestSet::none_only();
            set.merge(block_first_requests(program, *body));
            set
        }
        StmtKind::If { then_block, else_block, .. } => {
            let mut set = block_first_requests(program, *then_block);
            match else_block {
                Some(else_block) => set.merge(block_first_requests(program, *else_block)),
                None => set.includes_none = true,
            }
            set
        }
        StmtKind::Switch { cases, .. } => {
            let mut set = FirstRequestSet::default();
            for case in cases {
                set.merge(block_first_requests(program, case.body));
            }
            set
        }
        StmtKind::CallbackImplementation { body } => block_first_requests(program, *body),
        _ => FirstRequestSet::none_only(),
    }
}

/// `first_requests` of a sequence of siblings: walk until one that cannot
/// be skipped (`includes_none == false`), folding in every set passed
/// along the way.
#[must_use]
pub fn block_first_requests(program: &Program, block: BlockId) -> FirstRequestSet {
    let mut set = FirstRequestSet::none_only();
    for stmt in relevant_children(program, block) {
        let child = first_requests(program, stmt);
        let stops_here = !child.includes_none;
        set.merge(child);
        if stops_here {
            set.includes_none = false;
            return set;
        }
    }
    set
}

/// `true` if `stmt` may be merged into an adjacent `Step` (§4.3
/// `can_be_grouped`). `Loop` and `AcceptCallbacks` are never groupable;
/// `For` is groupable only if its body introduces no local declarations
/// and every child of its body is itself groupable.
pub fn can_be_grouped(program: &Program, stmt: StmtId) -> bool {
    match &program.stmts.get(stmt).kind {
        StmtKind::Loop { .. } | StmtKind::AcceptCallbacks { .. } => false,
        StmtKind::For { body, .. } => {
            let no_local_declarations = sequence_actions(program, *body).iter().all(|action| {
                !matches!(action, ReferenceAction::Declaration { reference, .. } if reference.index_count == 0)
            });
            no_local_declarations
                && relevant_children(program, *body).into_iter().all(|child| can_be_grouped(program, child))
        }
        _ => true,
    }
}

/// Array preallocation directives for a `For` body (§4.3
/// `variable_allocations`): every declaration with `dimensions > 0`
/// becomes an `Allocation` sized by the loop's range.
pub fn variable_allocations(program: &Program, stmt: StmtId) -> Vec<Allocation> {
    let StmtKind::For { index, range, body } = &program.stmts.get(stmt).kind else {
        return Vec::new();
    };
    sequence_actions(program, *body)
        .into_iter()
        .filter_map(|action| {
            let ReferenceAction::Declaration { reference, dimensions } = action else {
                return None;
            };
            if dimensions == 0 {
                return None;
            }
            Some(Allocation {
                variable: reference.variable,
                indexes: vec![*index],
                size: *range,
                dimensions,
            })
        })
        .collect()
}
