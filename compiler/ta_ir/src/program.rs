//! A fully parsed interface: the AST plus the arenas it indexes into.

use crate::{BlockArena, ExprArena, InterfaceDefinition, StmtArena, StringInterner, VariableTable};

/// Everything the parser produces for one IDL source file. Treated as
/// immutable after parsing (SPEC_FULL.md §4.2): later passes (`ta_analyze`,
/// `ta_driver`) build side tables keyed by the ids in here rather than
/// mutating it, except `ta_analyze::synthesize_resolution_nodes`, which
/// splices its resolution nodes directly into `stmts`/`blocks` once
/// validation has passed and before grouping runs.
pub struct Program {
    pub interner: StringInterner,
    pub variables: VariableTable,
    pub exprs: ExprArena,
    pub stmts: StmtArena,
    pub blocks: BlockArena,
    pub interface: InterfaceDefinition,
}
