//! Top-level interface: methods, callbacks, constants, and the main block.

use crate::{BlockId, Name, Span, VariableId};

/// `{ name, parameters:[Variable], return_type?, callbacks:[CallbackPrototype] }`.
#[derive(Clone, Debug)]
pub struct MethodPrototype {
    pub name: Name,
    pub name_span: Span,
    pub parameters: Vec<VariableId>,
    pub has_return_value: bool,
    pub callbacks: Vec<CallbackPrototype>,
}

/// A callback the evaluator may raise during a `Call`. Parameters are
/// constrained to scalars (`CALLBACK_PARAMETERS_MUST_BE_SCALARS`).
#[derive(Clone, Debug)]
pub struct CallbackPrototype {
    pub name: Name,
    pub name_span: Span,
    pub parameters: Vec<VariableId>,
    pub has_return_value: bool,
}

#[derive(Clone, Debug)]
pub struct Constant {
    pub name: Name,
    pub value: i64,
    pub span: Span,
}

/// `{ methods, callbacks, constants, main_block }`. The root of a compiled
/// interface, independent of the variable/expr/stmt/block arenas it
/// indexes into (see [`crate::Program`]).
#[derive(Clone, Debug)]
pub struct InterfaceDefinition {
    pub methods: Vec<MethodPrototype>,
    pub callbacks: Vec<CallbackPrototype>,
    pub constants: Vec<Constant>,
    pub main_block: BlockId,
}

impl InterfaceDefinition {
    #[must_use]
    pub fn find_method(&self, name: Name) -> Option<&MethodPrototype> {
        self.methods.iter().find(|m| m.name == name)
    }

    #[must_use]
    pub fn find_callback(&self, name: Name) -> Option<&CallbackPrototype> {
        self.callbacks.iter().find(|c| c.name == name)
    }
}
