//! Shared output types of the analysis passes (§4.3, §4.5).

use ta_ir::{ExprId, StmtId, VariableId};

/// A possible first wire-level request a node may expect from the
/// solution, per §4.3 `first_requests`. `None` (the sentinel, modeled
/// here as the absence of any variant rather than `Option<FirstRequest>`
/// to keep the request set itself the carrier of the sentinel) means the
/// node may be traversed without consuming a request at all.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FirstRequest {
    Exit,
    Call(ta_ir::Name),
}

/// The set of requests a node might see first, plus whether it may also
/// be skipped entirely (`includes_none`).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FirstRequestSet {
    pub requests: Vec<FirstRequest>,
    pub includes_none: bool,
}

impl FirstRequestSet {
    #[must_use]
    pub fn none_only() -> Self {
        FirstRequestSet { requests: Vec::new(), includes_none: true }
    }

    #[must_use]
    pub fn single(request: FirstRequest) -> Self {
        FirstRequestSet { requests: vec![request], includes_none: false }
    }

    pub fn merge(&mut self, other: FirstRequestSet) {
        for request in other.requests {
            if !self.requests.contains(&request) {
                self.requests.push(request);
            }
        }
        self.includes_none |= other.includes_none;
    }
}

/// Array preallocation directive derived from a `For` body (§4.3
/// `variable_allocations`): declare `variable`'s storage for `size`
/// elements along the axis introduced by this loop, indexed by the
/// enclosing loops' indexes.
#[derive(Clone, Debug)]
pub struct Allocation {
    pub variable: VariableId,
    pub indexes: Vec<VariableId>,
    pub size: ExprId,
    pub dimensions: u32,
}

/// One unit of the flattened, grouped statement sequence (§4.5): either a
/// run of adjacent, same-direction, groupable statements, or a single
/// non-groupable node driving its own state transition.
#[derive(Clone, Debug)]
pub enum Step {
    Group(Vec<StmtId>),
    Singleton(StmtId),
}
