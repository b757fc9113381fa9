//! Runtime storage for declared variables (§4.6 `bindings`) and lexical
//! frames for loop indexes and callback parameters (§4.7).
//!
//! Unlike the teacher's `LocalScope<T>` (`Rc<RefCell<T>>`, shared between
//! closures captured across an interpreter's call stack), nothing here is
//! shared: the driver engine is the sole owner of every binding (§5 "no
//! shared memory"), so a plain owned stack is enough.

use rustc_hash::FxHashMap;
use ta_ir::VariableId;

/// A declared variable's runtime value: either a scalar or, for a
/// variable with `dimensions > 0`, a (possibly ragged, preallocated)
/// array of values one axis deep.
#[derive(Clone, Debug)]
pub enum Value {
    Scalar(i64),
    Array(Vec<Value>),
}

impl Value {
    #[must_use]
    pub fn as_scalar(&self) -> i64 {
        match self {
            Value::Scalar(v) => *v,
            Value::Array(_) => 0,
        }
    }
}

/// The engine's variable store, keyed by `VariableId`. A `Reference`'s
/// concrete slot within a variable's value is found by walking `path`
/// (the concrete index values bound by the enclosing loops, evaluated in
/// declaration order), not by the `Reference` itself, which only
/// describes how many axes are left to resolve.
#[derive(Default)]
pub struct Bindings {
    storage: FxHashMap<VariableId, Value>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preallocate storage for one axis of `variable`, `size` elements
    /// long, at the slot reached by `path` (§4.3 `variable_allocations`).
    pub fn preallocate(&mut self, variable: VariableId, path: &[i64], size: usize) {
        let slot = navigate_mut(self.storage.entry(variable).or_insert(Value::Scalar(0)), path);
        *slot = Value::Array(vec![Value::Scalar(0); size]);
    }

    pub fn set_scalar(&mut self, variable: VariableId, path: &[i64], value: i64) {
        let slot = navigate_mut(self.storage.entry(variable).or_insert(Value::Scalar(0)), path);
        *slot = Value::Scalar(value);
    }

    #[must_use]
    pub fn get_scalar(&self, variable: VariableId, path: &[i64]) -> i64 {
        let mut node = self.storage.get(&variable).unwrap_or(&Value::Scalar(0));
        for &index in path {
            node = match node {
                Value::Array(items) => items.get(index as usize).unwrap_or(&Value::Scalar(0)),
                Value::Scalar(_) => node,
            };
        }
        node.as_scalar()
    }

    /// Whether `variable` has ever been written to this store, regardless
    /// of the lexical frame — used to tell a resolved reference from one
    /// whose declaration hasn't actually run on this path yet (§4.6
    /// resolution checks).
    #[must_use]
    pub fn is_bound(&self, variable: VariableId) -> bool {
        self.storage.contains_key(&variable)
    }

    #[must_use]
    pub fn get_value(&self, variable: VariableId, path: &[i64]) -> Value {
        let mut node = self.storage.get(&variable).unwrap_or(&Value::Scalar(0));
        for &index in path {
            node = match node {
                Value::Array(items) => items.get(index as usize).unwrap_or(&Value::Scalar(0)),
                Value::Scalar(_) => node,
            };
        }
        node.clone()
    }
}

fn navigate_mut<'a>(mut node: &'a mut Value, path: &[i64]) -> &'a mut Value {
    for &index in path {
        let index = index.max(0) as usize;
        if !matches!(node, Value::Array(_)) {
            *node = Value::Array(Vec::new());
        }
        let Value::Array(items) = node else {
            return node;
        };
        while items.len() <= index {
            items.push(Value::Scalar(0));
        }
        node = &mut items[index];
    }
    node
}

/// A stack of lexical scopes holding loop-index and callback-parameter
/// values (§4.7). Lookup walks the stack top-down; `For` pushes a scope
/// per iteration containing only its index, callback bodies push a scope
/// containing their parameters, and both pop on exit.
#[derive(Default)]
pub struct Frame {
    scopes: Vec<FxHashMap<VariableId, i64>>,
}

impl Frame {
    #[must_use]
    pub fn new() -> Self {
        Frame { scopes: vec![FxHashMap::default()] }
    }

    pub fn push(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn bind(&mut self, variable: VariableId, value: i64) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(variable, value);
        }
    }

    #[must_use]
    pub fn lookup(&self, variable: VariableId) -> Option<i64> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&variable).copied())
    }
}
