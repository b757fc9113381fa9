//! Statements, blocks, and callback prototypes (§3 Data model).

use crate::{ExprId, Name, Span, VariableId};
use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct StmtId(u32);

impl fmt::Debug for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StmtId({})", self.0)
    }
}

impl StmtId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct BlockId(u32);

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.0)
    }
}

impl BlockId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One labeled arm of a `switch`. Labels must be integer literals
/// (`SWITCH_LABEL_NOT_LITERAL` otherwise); non-literal labels are still
/// recorded here (as `None`) so the validator can report them without
/// the parser needing to reject the source outright.
#[derive(Clone, Debug)]
pub struct Case {
    pub labels: Vec<Option<i64>>,
    pub labels_span: Span,
    pub body: BlockId,
}

/// `Read`, `Write`, `Checkpoint`, `Call`, `CallbackStart`,
/// `CallbackImplementation`, `Return`, `For`, `Loop`, `If`, `Switch`,
/// `Break`, `Exit`, `MainExit`, plus the synthesized internal nodes the
/// analyzer inserts ahead of a resolution point.
#[derive(Clone, Debug)]
pub enum StmtKind {
    Read { args: Vec<ExprId> },
    Write { args: Vec<ExprId> },
    Checkpoint,
    Call {
        method: Name,
        args: Vec<ExprId>,
        return_value: Option<ExprId>,
    },
    CallbackStart { callback: Name, params: Vec<VariableId> },
    CallbackImplementation { body: BlockId },
    Return { value: Option<ExprId> },
    For { index: VariableId, range: ExprId, body: BlockId },
    Loop { body: BlockId },
    If { cond: ExprId, then_block: BlockId, else_block: Option<BlockId> },
    Switch { value: ExprId, cases: Vec<Case> },
    Break,
    Exit,
    MainExit,

    /// Synthesized ahead of an unresolved `Switch` value: resolves the
    /// value via request lookahead before any case body runs.
    SwitchValueResolve { value: ExprId },
    /// Synthesized ahead of an unresolved `If` condition.
    IfConditionResolve { cond: ExprId },
    /// Synthesized ahead of a `Call`: resolves every argument that is not
    /// already known at this point in the context.
    CallArgumentsResolve { args: Vec<ExprId> },
    /// Synthesized after a `Call`: loops receiving callback invocations
    /// until the solution signals it is done raising callbacks.
    AcceptCallbacks { callbacks: Vec<Name> },

    /// Skeleton-generator artefacts (per-language template emission).
    /// Always irrelevant to the driver: see [`crate::Block`] construction
    /// and the context threader's `is_relevant` filter.
    PrintCallbackRequest,
    PrintCallbackIndex,
    PrintCallbackNoCallbacks,
}

#[derive(Clone, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// An ordered sequence of statement ids. This is the *syntactic* block —
/// what the parser produced. The derived `flat_inner_nodes` (irrelevant
/// nodes filtered, context threaded) and `children` (grouped into `Step`s)
/// sequences live in `ta_analyze`'s side tables keyed by `BlockId`, not on
/// this struct, since they are produced by a later pass over an otherwise
/// immutable AST (see SPEC_FULL.md §9 "Lazy computed properties").
#[derive(Clone, Debug, Default)]
pub struct Block {
    pub stmts: Vec<StmtId>,
}

#[derive(Default)]
pub struct StmtArena {
    stmts: Vec<Stmt>,
}

impl StmtArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, kind: StmtKind, span: Span) -> StmtId {
        let id = StmtId(crate::limits::to_u32(self.stmts.len(), "statement arena"));
        self.stmts.push(Stmt { kind, span });
        id
    }

    #[must_use]
    pub fn get(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }
}

#[derive(Default)]
pub struct BlockArena {
    blocks: Vec<Block>,
}

impl BlockArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, block: Block) -> BlockId {
        let id = BlockId(crate::limits::to_u32(self.blocks.len(), "block arena"));
        self.blocks.push(block);
        id
    }

    #[must_use]
    pub fn get(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    /// Mutable access for the synthesis pass, which splices resolution
    /// nodes into an already-parsed block's statement list in place.
    pub fn get_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.index()]
    }
}

/// `true` for every node the driver actually executes; `false` for
/// skeleton-generator artefacts that the context threader drops from
/// `flat_inner_nodes` (§4.2 step 2).
#[must_use]
pub fn is_relevant(kind: &StmtKind) -> bool {
    !matches!(
        kind,
        StmtKind::PrintCallbackRequest | StmtKind::PrintCallbackIndex | StmtKind::PrintCallbackNoCallbacks
    )
}
