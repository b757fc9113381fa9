//! AST node variants (§3 Data model).

mod expr;
mod interface;
mod stmt;

pub use expr::{Expr, ExprArena, ExprId, ExprKind};
pub use interface::{CallbackPrototype, Constant, InterfaceDefinition, MethodPrototype};
pub use stmt::{is_relevant, Block, BlockArena, BlockId, Case, Stmt, StmtArena, StmtId, StmtKind};
