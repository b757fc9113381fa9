//! Shared mutable state threaded through the grammar modules: the arenas
//! being built, plus a name-resolution scope stack.

use rustc_hash::FxHashMap;
use ta_ir::{BlockArena, ExprArena, Name, StmtArena, StringInterner, VariableId, VariableTable};

pub(crate) struct ParserState {
    pub interner: StringInterner,
    pub variables: VariableTable,
    pub exprs: ExprArena,
    pub stmts: StmtArena,
    pub blocks: BlockArena,
    /// Name resolution scopes, innermost last. The base scope (index 0)
    /// holds every `var`-declared name for the whole program; `for` loops
    /// and callback implementations push a scope for their own bindings
    /// and pop it on exit.
    scopes: Vec<FxHashMap<Name, VariableId>>,
}

impl ParserState {
    pub(crate) fn new(interner: StringInterner) -> Self {
        ParserState {
            interner,
            variables: VariableTable::new(),
            exprs: ExprArena::new(),
            stmts: StmtArena::new(),
            blocks: BlockArena::new(),
            scopes: vec![FxHashMap::default()],
        }
    }

    pub(crate) fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scopes.pop();
        debug_assert!(!self.scopes.is_empty());
    }

    /// Declare a fresh variable bound to `name` in the innermost scope.
    pub(crate) fn declare(&mut self, name: Name, dimensions: u32, span: ta_ir::Span) -> VariableId {
        let id = self.variables.declare(name, dimensions, span);
        self.scopes.last_mut().expect("base scope always present").insert(name, id);
        id
    }

    /// Declare a fresh variable that is *not* entered into any
    /// resolution scope: used for method/callback prototype parameters,
    /// which are addressed positionally by the driver rather than looked
    /// up by name from the main block.
    pub(crate) fn declare_unscoped(&mut self, name: Name, dimensions: u32, span: ta_ir::Span) -> VariableId {
        self.variables.declare(name, dimensions, span)
    }

    /// Resolve `name` against the scope stack, innermost first. If the
    /// name has never been declared anywhere, a zero-dimension variable
    /// is allocated on the spot and registered in the outermost scope:
    /// the parser performs no semantic checks, so an undeclared reference
    /// is not a parse failure — it becomes a dangling reference for the
    /// validator to flag as `VariableNotDeclared`.
    pub(crate) fn resolve(&mut self, name: Name, span: ta_ir::Span) -> VariableId {
        for scope in self.scopes.iter().rev() {
            if let Some(&id) = scope.get(&name) {
                return id;
            }
        }
        let id = self.variables.declare(name, 0, span);
        self.scopes[0].insert(name, id);
        id
    }
}
