//! Variables and references (§3 Data model).

use crate::{Name, Span};
use std::fmt;

/// Index into a [`VariableTable`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct VariableId(u32);

impl VariableId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VariableId({})", self.0)
    }
}

/// `{ name, dimensions }`. Identity is by name within the declaring scope;
/// the `VariableId` that indexes it is assigned once, at `var`/parameter
/// declaration time, and never reused for a different variable.
#[derive(Clone, Debug)]
pub struct Variable {
    pub name: Name,
    pub dimensions: u32,
    pub span: Span,
}

/// Flat arena of declared variables. Parameters, callback parameters, and
/// `var` statements all allocate their `VariableId`s from the same table
/// that owns the whole interface, so a `Reference` is always a cheap
/// `(VariableId, u32)` pair rather than a name lookup.
#[derive(Default)]
pub struct VariableTable {
    variables: Vec<Variable>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: Name, dimensions: u32, span: Span) -> VariableId {
        let id = VariableId(crate::limits::to_u32(self.variables.len(), "variable table"));
        self.variables.push(Variable { name, dimensions, span });
        id
    }

    #[must_use]
    pub fn get(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, v)| (VariableId(crate::limits::to_u32(i, "variable table")), v))
    }
}

/// `{ variable, index_count }`, `0 <= index_count <= variable.dimensions`.
///
/// "This variable, subscripted this many times from the outermost axis."
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Reference {
    pub variable: VariableId,
    pub index_count: u32,
}

impl Reference {
    #[inline]
    #[must_use]
    pub const fn whole(variable: VariableId) -> Reference {
        Reference { variable, index_count: 0 }
    }

    /// Reference with one fewer level of subscripting, used when lifting
    /// an action out of a `For` body to the context that encloses the loop
    /// (§4.3 `reference_actions(For)`).
    ///
    /// Returns `None` when decrementing would make `index_count` negative,
    /// which marks the action as local to the loop rather than liftable.
    #[must_use]
    pub fn lift(self) -> Option<Reference> {
        self.index_count.checked_sub(1).map(|index_count| Reference {
            variable: self.variable,
            index_count,
        })
    }

    /// Reference with one more level of subscripting, the inverse of
    /// [`Reference::lift`], used when descending into a `For` body.
    #[inline]
    #[must_use]
    pub const fn subscripted(self) -> Reference {
        Reference {
            variable: self.variable,
            index_count: self.index_count + 1,
        }
    }
}
