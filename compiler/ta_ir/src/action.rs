//! Reference actions and directions (§3 Data model).

use crate::Reference;

/// A tagged annotation a node introduces along its path: either it brings
/// a reference into existence, or it asserts that an existing reference
/// now has a concrete value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ReferenceAction {
    /// Introduces `reference` (or a sub-slot of its variable) for the
    /// first time. `dimensions` is the number of axes still undeclared
    /// below this reference (the variable's own dimensions minus the
    /// reference's `index_count`).
    Declaration { reference: Reference, dimensions: u32 },
    /// Asserts `reference` has a concrete value at this point.
    Resolution { reference: Reference },
}

impl ReferenceAction {
    #[must_use]
    pub const fn reference(&self) -> Reference {
        match *self {
            ReferenceAction::Declaration { reference, .. } | ReferenceAction::Resolution { reference } => {
                reference
            }
        }
    }

    /// Lift this action out of a `For` body by decrementing its
    /// reference's `index_count`. Returns `None` if the action is local
    /// to the loop (its reference used the loop's own index).
    #[must_use]
    pub fn lift(self) -> Option<ReferenceAction> {
        match self {
            ReferenceAction::Declaration { reference, dimensions } => {
                reference.lift().map(|reference| ReferenceAction::Declaration { reference, dimensions })
            }
            ReferenceAction::Resolution { reference } => {
                reference.lift().map(|reference| ReferenceAction::Resolution { reference })
            }
        }
    }
}

/// Which side produces the data of an I/O node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Direction {
    /// driver → solution; produced by `Read`.
    Downward,
    /// solution → driver; produced by `Checkpoint`, `CallbackStart`, `CallReturn`.
    Upward,
}

/// A small set of [`Direction`]s, used to check invariant 5 ("every step
/// contains statements of at most one direction"). Two bits is plenty; a
/// `rustc_hash`-backed set would be overkill for a domain of size two.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct DirectionSet {
    downward: bool,
    upward: bool,
}

impl DirectionSet {
    pub const EMPTY: DirectionSet = DirectionSet { downward: false, upward: false };

    #[must_use]
    pub const fn single(direction: Direction) -> DirectionSet {
        match direction {
            Direction::Downward => DirectionSet { downward: true, upward: false },
            Direction::Upward => DirectionSet { downward: false, upward: true },
        }
    }

    pub fn insert(&mut self, direction: Direction) {
        match direction {
            Direction::Downward => self.downward = true,
            Direction::Upward => self.upward = true,
        }
    }

    #[must_use]
    pub fn union(self, other: DirectionSet) -> DirectionSet {
        DirectionSet {
            downward: self.downward || other.downward,
            upward: self.upward || other.upward,
        }
    }

    #[must_use]
    pub const fn len(self) -> u32 {
        self.downward as u32 + self.upward as u32
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.downward && !self.upward
    }
}
