//! Expressions (§3 Data model): literals, variables, subscripting.
//!
//! Expressions are restricted to literals, variables, and subscripting —
//! deliberately not Turing-complete (§1 Non-goals) — so the whole sum type
//! fits in three variants and never needs a general evaluator.

use crate::{Span, Variable, VariableId, VariableTable};
use std::fmt;

/// Index into an [`ExprArena`]. Flat, not `Box<Expr>`: subscript chains are
/// index hops rather than pointer chases, and the whole AST is `Copy`-free
/// to clone (cloning an `ExprId` is a `u32` copy).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

impl ExprId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One of `IntLiteral(v)`, `VariableReference(name)`, `Subscript(array, index)`.
#[derive(Clone, Debug)]
pub enum ExprKind {
    IntLiteral(i64),
    VariableReference(VariableId),
    Subscript { array: ExprId, index: ExprId },
}

#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Flat storage for every expression in the interface, indexed by [`ExprId`].
#[derive(Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId(crate::limits::to_u32(self.exprs.len(), "expression arena"));
        self.exprs.push(Expr { kind, span });
        id
    }

    #[must_use]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Derivable `dimensions` of an expression: literal is 0, a variable
    /// reference is its declared dimensionality, a subscript is its
    /// array's dimensions minus one, clamped at 0.
    #[must_use]
    pub fn dimensions(&self, id: ExprId, variables: &VariableTable) -> u32 {
        match &self.get(id).kind {
            ExprKind::IntLiteral(_) => 0,
            ExprKind::VariableReference(var) => variables.get(*var).dimensions,
            ExprKind::Subscript { array, .. } => self.dimensions(*array, variables).saturating_sub(1),
        }
    }

    /// Walk a (possibly nested) subscript chain down to its base variable
    /// and the number of subscripts applied, i.e. this expression's
    /// [`crate::Reference`] in the sense of §3.
    #[must_use]
    pub fn base_variable(&self, id: ExprId) -> Option<(VariableId, u32)> {
        match &self.get(id).kind {
            ExprKind::IntLiteral(_) => None,
            ExprKind::VariableReference(var) => Some((*var, 0)),
            ExprKind::Subscript { array, .. } => {
                self.base_variable(*array).map(|(var, depth)| (var, depth + 1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Name;

    fn dummy_name() -> Name {
        let mut interner = crate::StringInterner::new();
        interner.intern("v")
    }

    #[test]
    fn subscript_dimensions_decrease() {
        let mut vars = VariableTable::new();
        let _ = Variable { name: dummy_name(), dimensions: 2, span: Span::DUMMY };
        let var = vars.declare(dummy_name(), 2, Span::DUMMY);

        let mut exprs = ExprArena::new();
        let v = exprs.alloc(ExprKind::VariableReference(var), Span::DUMMY);
        let i0 = exprs.alloc(ExprKind::IntLiteral(0), Span::DUMMY);
        let sub = exprs.alloc(ExprKind::Subscript { array: v, index: i0 }, Span::DUMMY);

        assert_eq!(exprs.dimensions(v, &vars), 2);
        assert_eq!(exprs.dimensions(sub, &vars), 1);
        assert_eq!(exprs.base_variable(sub), Some((var, 1)));
    }
}
