//! TuringArena IR — core AST, reference model, and arena types.
//!
//! This crate contains the data structures the rest of the compiler shares:
//! - `Span` for source locations
//! - `Name` for interned identifiers
//! - `Variable` / `Reference` / `ReferenceAction` / `Direction`, the
//!   reference model §3 is built on
//! - AST nodes (`Expr`, `Stmt`, `Block`, `InterfaceDefinition`)
//! - Flat arenas (`ExprArena`, `StmtArena`, `BlockArena`, `VariableTable`)
//!   so the AST never needs `Box` or owned back-pointers (SPEC_FULL.md §9
//!   "Cyclic references / back-references").
//!
//! # Design philosophy
//!
//! - **Intern identifiers**: strings become `Name(u32)`.
//! - **Flatten the tree**: no `Box<Expr>` / `Box<Stmt>`, everything is an
//!   arena index.
//! - **Immutable after parsing**: later passes attach derived data in side
//!   tables keyed by id rather than mutating a node in place, with one
//!   exception — `ta_analyze::synthesize_resolution_nodes` splices new
//!   statement ids into a block's own `stmts` list once validation has
//!   passed, since the nodes it inserts exist only to be executed and
//!   have no side table of their own to live in.

mod action;
pub mod ast;
mod limits;
mod name;
mod program;
mod span;
mod variable;

pub use action::{Direction, DirectionSet, ReferenceAction};
pub use ast::{
    is_relevant, Block, BlockArena, BlockId, CallbackPrototype, Case, Constant, Expr, ExprArena, ExprId,
    ExprKind, InterfaceDefinition, MethodPrototype, Stmt, StmtArena, StmtId, StmtKind,
};
pub use name::{Name, StringInterner};
pub use program::Program;
pub use span::Span;
pub use variable::{Reference, Variable, VariableId, VariableTable};
