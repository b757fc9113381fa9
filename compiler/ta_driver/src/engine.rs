//! Driver Engine (§4.6): executes a compiled interface's main block over
//! a pair of line-oriented streams connected to a sandboxed solution
//! process.
//!
//! **Protocol direction, as implemented**: the engine is the active side.
//! For a `Call`, it writes a `method_call` message (§6) describing which
//! method the solution should run and which callbacks it may raise
//! during that run, then alternates reading callback indexes and running
//! the matching registered callback body itself (since, per §4.2, a
//! callback's body is this engine's own IR, not the sandboxed process's
//! code) before replying with that callback's return value, and finally
//! reads the method's own return value if declared. `input`/`output`
//! steps bypass this framing entirely: they are the literal stdin/stdout
//! of the sandboxed process, so the engine reads or writes one bare
//! scalar line per argument, no discriminator.
//!
//! The stream of scalar input values fed downward through `Read` steps is
//! not part of the IDL itself (§1 Non-goals: problem packaging and test
//! data loading are external collaborators), so the engine takes it as a
//! plain `Iterator<Item = i64>` supplied by the caller.

use std::io::{BufRead, Write};

use rustc_hash::FxHashMap;
use ta_analyze::{
    block_first_requests, group_program, relevant_children, variable_allocations, FirstRequest, GroupTable, Step,
};
use ta_diagnostic::InterfaceError;
use ta_ir::{BlockId, ExprId, ExprKind, Name, Program, StmtId, StmtKind, VariableId};

use crate::bindings::{Bindings, Frame};
use crate::error::DriverError;
use crate::wire::{CallbackSignature, Decoder, Encoder, Request, WireValue};

/// Which half of a run the engine is in: `Preflight` walks the whole tree
/// checking that every construct the wire protocol will have to satisfy
/// (a call's arity, a switch's first possible requests, a callback set)
/// actually can be, with no I/O; `Run` is the ordinary execution loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Preflight,
    Run,
}

/// What `execute_call` leaves behind for the `AcceptCallbacks` node
/// synthesized right after it to pick up: whether a return value is
/// still owed, and where to bind it if the caller wants one.
struct PendingReturn {
    has_return_value: bool,
    target: Option<ExprId>,
}

/// A notable point in the interaction, surfaced to an observer rather
/// than printed, so the evaluator half of this system can turn it into
/// whatever reporting it needs (§6 "Evaluator ↔ driver interface").
#[derive(Clone, Debug)]
pub enum Event {
    Call { method: Name },
    CallbackRaised { callback: Name },
    MethodReturned { value: Option<i64> },
    Exited,
}

/// What a block execution did, propagated up to the nearest construct
/// that can act on it.
enum Flow {
    Continue,
    Break,
    Return(Option<i64>),
    Exited,
}

struct CallbackDef {
    params: Vec<VariableId>,
    body: BlockId,
}

pub struct Engine<'p, R, W, In> {
    program: &'p Program,
    groups: GroupTable,
    callbacks: FxHashMap<Name, CallbackDef>,
    frame: Frame,
    bindings: Bindings,
    decoder: Decoder<R>,
    encoder: Encoder<W>,
    input: In,
    phase: Phase,
    /// The `MethodCall` a `Call` just wrote, held for the synthesized
    /// `AcceptCallbacks` right after it to consume (§4.6 "request
    /// lookahead"). Never read back across more than one statement.
    request_lookahead: Option<Request>,
    pending_return: Option<PendingReturn>,
}

impl<'p, R: BufRead, W: Write, In: Iterator<Item = i64>> Engine<'p, R, W, In> {
    #[must_use]
    pub fn new(program: &'p Program, reader: R, writer: W, input: In) -> Self {
        Engine {
            program,
            groups: group_program(program),
            callbacks: collect_callbacks(program),
            frame: Frame::new(),
            bindings: Bindings::new(),
            decoder: Decoder::new(reader),
            encoder: Encoder::new(writer),
            input,
            phase: Phase::Preflight,
            request_lookahead: None,
            pending_return: None,
        }
    }

    /// Runs the whole interface's main block to completion, or until an
    /// `exit`/protocol failure stops it early.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(mut self, on_event: &mut dyn FnMut(Event)) -> Result<(), DriverError> {
        let main_block = self.program.interface.main_block;
        self.phase = Phase::Preflight;
        self.preflight_block(main_block)?;
        self.phase = Phase::Run;
        if let Flow::Exited = self.execute_block(main_block, on_event)? {
            on_event(Event::Exited);
        }
        Ok(())
    }

    /// Walks the whole tree with no wire I/O, confirming that every call,
    /// callback set, and switch the run will hit can actually be
    /// satisfied against the declared interface before a single byte is
    /// exchanged with the solution.
    fn preflight_block(&self, block: BlockId) -> Result<(), DriverError> {
        for stmt in relevant_children(self.program, block) {
            self.preflight_stmt(stmt)?;
        }
        Ok(())
    }

    fn preflight_stmt(&self, stmt: StmtId) -> Result<(), DriverError> {
        match &self.program.stmts.get(stmt).kind {
            StmtKind::Call { method, args, .. } => {
                let Some(prototype) = self.program.interface.find_method(*method) else {
                    return Err(InterfaceError::MalformedMessage(format!(
                        "call to undeclared method `{}`",
                        self.resolve(*method)
                    ))
                    .into());
                };
                if args.len() != prototype.parameters.len() {
                    return Err(InterfaceError::CallArityMismatch {
                        method: self.resolve(*method),
                        expected: prototype.parameters.len(),
                        got: args.len(),
                    }
                    .into());
                }
                Ok(())
            }
            StmtKind::AcceptCallbacks { callbacks } => {
                for &callback in callbacks {
                    // `callbacks` is synthesized straight from the called
                    // method's own prototype, so `find_callback` always
                    // succeeds here; what isn't guaranteed is that the
                    // source actually wrote a `callback name(...) { ... }`
                    // body for it anywhere — that's the gap this preflight
                    // pass exists to catch before the run blocks on a
                    // request it can never resolve.
                    if !self.callbacks.contains_key(&callback) {
                        return Err(InterfaceError::UnknownCallback { name: self.resolve(callback) }.into());
                    }
                }
                Ok(())
            }
            StmtKind::Switch { cases, .. } => {
                for case in cases {
                    self.check_first_requests(case.body)?;
                    self.preflight_block(case.body)?;
                }
                Ok(())
            }
            StmtKind::If { then_block, else_block, .. } => {
                self.preflight_block(*then_block)?;
                if let Some(else_block) = else_block {
                    self.preflight_block(*else_block)?;
                }
                Ok(())
            }
            StmtKind::For { body, .. } | StmtKind::Loop { body } | StmtKind::CallbackImplementation { body } => {
                self.preflight_block(*body)
            }
            _ => Ok(()),
        }
    }

    /// A case body's `first_requests` (§4.3) must only ever name methods
    /// the interface actually declares: this is the one place that set is
    /// consumed, turning "what request could this block see first" into a
    /// concrete preflight check rather than dead analysis output.
    fn check_first_requests(&self, block: BlockId) -> Result<(), DriverError> {
        for request in block_first_requests(self.program, block).requests {
            if let FirstRequest::Call(method) = request {
                if self.program.interface.find_method(method).is_none() {
                    return Err(InterfaceError::MalformedMessage(format!(
                        "case body may start with a call to undeclared method `{}`",
                        self.resolve(method)
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }

    fn execute_block(&mut self, block: BlockId, on_event: &mut dyn FnMut(Event)) -> Result<Flow, DriverError> {
        let steps = self.groups.get(&block).cloned().unwrap_or_default();
        for step in steps {
            let flow = match step {
                Step::Group(stmts) => self.execute_group(&stmts, on_event)?,
                Step::Singleton(stmt) => self.execute_stmt(stmt, on_event)?,
            };
            if !matches!(flow, Flow::Continue) {
                return Ok(flow);
            }
        }
        Ok(Flow::Continue)
    }

    fn execute_group(&mut self, stmts: &[StmtId], on_event: &mut dyn FnMut(Event)) -> Result<Flow, DriverError> {
        for &stmt in stmts {
            let flow = self.execute_stmt(stmt, on_event)?;
            if !matches!(flow, Flow::Continue) {
                return Ok(flow);
            }
        }
        self.encoder.flush()?;
        Ok(Flow::Continue)
    }

    fn execute_stmt(&mut self, stmt: StmtId, on_event: &mut dyn FnMut(Event)) -> Result<Flow, DriverError> {
        debug_assert_eq!(self.phase, Phase::Run, "execute_stmt must not run during preflight");
        let kind = self.program.stmts.get(stmt).kind.clone();
        match kind {
            StmtKind::Read { args } => {
                for arg in args {
                    let value = self.input.next().ok_or_else(|| {
                        InterfaceError::MalformedMessage("input exhausted before `input` statement".to_string())
                    })?;
                    self.bind_expr(arg, value);
                    self.encoder.write_scalar(value)?;
                }
                Ok(Flow::Continue)
            }
            StmtKind::Write { args } => {
                for arg in args {
                    let value = self.decoder.read_raw_scalar()?;
                    self.bind_expr(arg, value);
                }
                Ok(Flow::Continue)
            }
            StmtKind::Checkpoint => {
                let _ = self.decoder.read_raw_scalar()?;
                Ok(Flow::Continue)
            }
            // Registration happened up front in `collect_callbacks`; seeing
            // either half of the pair during ordinary block execution is a
            // no-op, since a callback body only ever runs on demand from
            // `dispatch_callbacks`.
            StmtKind::CallbackStart { .. } | StmtKind::CallbackImplementation { .. } => Ok(Flow::Continue),
            StmtKind::Break => Ok(Flow::Break),
            StmtKind::Exit => {
                self.encoder.write_exit()?;
                Ok(Flow::Exited)
            }
            StmtKind::MainExit => Ok(Flow::Exited),
            StmtKind::Return { value } => Ok(Flow::Return(value.map(|expr| self.eval_expr(expr)))),
            StmtKind::For { index, range, body } => self.execute_for(stmt, index, range, body, on_event),
            StmtKind::Loop { body } => self.execute_loop(body, on_event),
            StmtKind::If { cond, then_block, else_block } => {
                if self.eval_expr(cond) != 0 {
                    self.execute_block(then_block, on_event)
                } else if let Some(else_block) = else_block {
                    self.execute_block(else_block, on_event)
                } else {
                    Ok(Flow::Continue)
                }
            }
            StmtKind::Switch { value, cases } => {
                let resolved = self.eval_expr(value);
                match cases.iter().find(|case| case.labels.contains(&Some(resolved))) {
                    Some(case) => self.execute_block(case.body, on_event),
                    None => Err(InterfaceError::NoMatchingCase { value: resolved }.into()),
                }
            }
            StmtKind::Call { method, args, return_value } => self.execute_call(method, args, return_value, on_event),
            StmtKind::AcceptCallbacks { callbacks } => self.execute_accept_callbacks(&callbacks, on_event),
            StmtKind::SwitchValueResolve { value } => self.check_resolved(value),
            StmtKind::IfConditionResolve { cond } => self.check_resolved(cond),
            StmtKind::CallArgumentsResolve { args } => {
                for arg in args {
                    self.check_resolved(arg)?;
                }
                Ok(Flow::Continue)
            }
            StmtKind::PrintCallbackRequest | StmtKind::PrintCallbackIndex | StmtKind::PrintCallbackNoCallbacks => {
                Ok(Flow::Continue)
            }
        }
    }

    /// Asserts `expr` is resolvable right now — its base variable has
    /// actually been bound on this execution path, not merely declared on
    /// *some* path through a prior `If`/`Switch` that static context
    /// threading cannot distinguish (§4.2's `If` arm folds both branches'
    /// declarations together). Catches a variable referenced after a
    /// branch that, at runtime, didn't run.
    fn check_resolved(&self, expr: ExprId) -> Result<Flow, DriverError> {
        if self.is_resolved(expr) {
            Ok(Flow::Continue)
        } else {
            Err(InterfaceError::MalformedMessage(
                "reference used before its declaration actually ran on this path".to_string(),
            )
            .into())
        }
    }

    fn is_resolved(&self, expr: ExprId) -> bool {
        match &self.program.exprs.get(expr).kind {
            ExprKind::IntLiteral(_) => true,
            ExprKind::VariableReference(variable) => {
                self.frame.lookup(*variable).is_some() || self.bindings.is_bound(*variable)
            }
            ExprKind::Subscript { array, .. } => self.is_resolved(*array),
        }
    }

    fn execute_for(
        &mut self,
        stmt: StmtId,
        index: VariableId,
        range: ExprId,
        body: BlockId,
        on_event: &mut dyn FnMut(Event),
    ) -> Result<Flow, DriverError> {
        // Each `Allocation` is keyed by this loop's own index variable
        // (`indexes == [index]`), so the path it preallocates at only
        // exists once that index is bound to the current iteration.
        let allocations = variable_allocations(self.program, stmt);

        let count = self.eval_expr(range).max(0);
        for i in 0..count {
            self.frame.push();
            self.frame.bind(index, i);
            for allocation in &allocations {
                let path: Vec<i64> =
                    allocation.indexes.iter().map(|&v| self.frame.lookup(v).unwrap_or(0)).collect();
                let size = usize::try_from(self.eval_expr(allocation.size).max(0)).unwrap_or(0);
                self.bindings.preallocate(allocation.variable, &path, size);
            }
            let flow = self.execute_block(body, on_event)?;
            self.frame.pop();
            match flow {
                Flow::Break => break,
                Flow::Continue => {}
                other @ (Flow::Return(_) | Flow::Exited) => return Ok(other),
            }
        }
        Ok(Flow::Continue)
    }

    fn execute_loop(&mut self, body: BlockId, on_event: &mut dyn FnMut(Event)) -> Result<Flow, DriverError> {
        loop {
            match self.execute_block(body, on_event)? {
                Flow::Break => return Ok(Flow::Continue),
                Flow::Continue => {}
                other @ (Flow::Return(_) | Flow::Exited) => return Ok(other),
            }
        }
    }

    /// Writes the `MethodCall` request and nothing else: the callback
    /// dispatch loop and the return-value read happen in
    /// `execute_accept_callbacks`, driven by the `AcceptCallbacks` node
    /// synthesis always places right after a `Call` (§4.6). `request_lookahead`
    /// and `pending_return` are how this handler hands the call it just
    /// made to that node without the two re-deriving anything from the
    /// wire.
    fn execute_call(
        &mut self,
        method: Name,
        args: Vec<ExprId>,
        return_value: Option<ExprId>,
        on_event: &mut dyn FnMut(Event),
    ) -> Result<Flow, DriverError> {
        on_event(Event::Call { method });
        let Some(prototype) = self.program.interface.find_method(method) else {
            return Err(InterfaceError::MalformedMessage(format!(
                "call to undeclared method `{}`",
                self.resolve(method)
            ))
            .into());
        };
        let has_return_value = prototype.has_return_value;
        let callback_signatures: Vec<CallbackSignature> = prototype
            .callbacks
            .iter()
            .map(|cb| CallbackSignature { name: self.resolve(cb.name), param_count: cb.parameters.len() })
            .collect();
        let wire_args: Vec<WireValue> = args.iter().map(|&expr| WireValue::Scalar(self.eval_expr(expr))).collect();

        let request = Request::MethodCall {
            name: self.resolve(method),
            args: wire_args,
            has_return_value,
            callbacks: callback_signatures,
        };
        self.encoder.write_request(&request)?;
        self.encoder.flush()?;

        self.request_lookahead = Some(request);
        self.pending_return = Some(PendingReturn { has_return_value, target: return_value });
        Ok(Flow::Continue)
    }

    /// Consumes the `MethodCall` `execute_call` just cached, runs the
    /// callback dispatch loop against its declared callback set, and then
    /// reads and binds the method's return value if it owes one.
    fn execute_accept_callbacks(
        &mut self,
        declared: &[Name],
        on_event: &mut dyn FnMut(Event),
    ) -> Result<Flow, DriverError> {
        let Some(Request::MethodCall { callbacks, .. }) = self.request_lookahead.take() else {
            return Err(InterfaceError::MalformedMessage(
                "AcceptCallbacks reached without a pending call".to_string(),
            )
            .into());
        };
        debug_assert_eq!(declared.len(), callbacks.len());

        self.dispatch_callbacks(declared, on_event)?;

        let Some(pending) = self.pending_return.take() else {
            return Err(InterfaceError::MalformedMessage(
                "AcceptCallbacks reached without a pending return".to_string(),
            )
            .into());
        };
        let value = if pending.has_return_value { Some(self.decoder.read_raw_scalar()?) } else { None };
        on_event(Event::MethodReturned { value });
        if let (Some(target), Some(value)) = (pending.target, value) {
            self.bind_expr(target, value);
        }
        Ok(Flow::Continue)
    }

    /// Reads callback indexes (into `order`, the method's declared
    /// callback list) until the sentinel (`-1`), running each raised
    /// callback's registered body and replying with its return value
    /// before asking for the next one.
    fn dispatch_callbacks(&mut self, order: &[Name], on_event: &mut dyn FnMut(Event)) -> Result<(), DriverError> {
        loop {
            let index = self.decoder.read_raw_scalar()?;
            if index < 0 {
                return Ok(());
            }
            let Some(&name) = usize::try_from(index).ok().and_then(|i| order.get(i)) else {
                return Err(InterfaceError::MalformedMessage(format!("callback index {index} out of range")).into());
            };
            let Some(def) = self.callbacks.get(&name) else {
                return Err(InterfaceError::UnknownCallback { name: self.resolve(name) }.into());
            };
            let params = def.params.clone();
            let body = def.body;
            on_event(Event::CallbackRaised { callback: name });

            self.frame.push();
            for &param in &params {
                let value = self.decoder.read_raw_scalar()?;
                self.frame.bind(param, value);
            }
            let flow = self.execute_block(body, on_event)?;
            self.frame.pop();

            let returned = match flow {
                Flow::Return(value) => value,
                _ => None,
            };
            self.encoder.write_request(&Request::CallbackReturn { value: returned })?;
            self.encoder.flush()?;
        }
    }

    fn resolve(&self, name: Name) -> String {
        self.program.interner.resolve(name).to_string()
    }

    fn bind_expr(&mut self, expr: ExprId, value: i64) {
        let (variable, path) = self.eval_place(expr);
        self.bindings.set_scalar(variable, &path, value);
    }

    fn eval_expr(&self, expr: ExprId) -> i64 {
        match &self.program.exprs.get(expr).kind {
            ExprKind::IntLiteral(value) => *value,
            ExprKind::VariableReference(variable) => self
                .frame
                .lookup(*variable)
                .unwrap_or_else(|| self.bindings.get_scalar(*variable, &[])),
            ExprKind::Subscript { .. } => {
                let (variable, path) = self.eval_place(expr);
                self.bindings.get_scalar(variable, &path)
            }
        }
    }

    /// Walks a (possibly nested) subscript chain down to its base
    /// variable and the concrete index values along the way, evaluating
    /// each index expression against the current frame/bindings.
    ///
    /// Only ever called on a variable-rooted expression: the grammar
    /// accepts a bare integer literal as a `Read`/`Write`/assigned-`Call`
    /// target, but that source is meaningless (there is nowhere to store
    /// a value) and not expected to reach here in a validated program.
    fn eval_place(&self, expr: ExprId) -> (VariableId, Vec<i64>) {
        match &self.program.exprs.get(expr).kind {
            ExprKind::VariableReference(variable) => (*variable, Vec::new()),
            ExprKind::Subscript { array, index } => {
                let (variable, mut path) = self.eval_place(*array);
                path.push(self.eval_expr(*index));
                (variable, path)
            }
            ExprKind::IntLiteral(_) => unreachable!("a literal is never a valid assignment place"),
        }
    }
}

/// Pre-scans the whole program once for `callback name(...) { ... }` pairs
/// (a `CallbackStart` immediately followed by its `CallbackImplementation`,
/// as `ta_parse` always emits them), wherever in the tree they appear.
/// Building this up front means `execute_stmt` never needs to reconstruct
/// a pairing at dispatch time.
fn collect_callbacks(program: &Program) -> FxHashMap<Name, CallbackDef> {
    let mut callbacks = FxHashMap::default();
    collect_in_block(program, program.interface.main_block, &mut callbacks);
    callbacks
}

fn collect_in_block(program: &Program, block: BlockId, callbacks: &mut FxHashMap<Name, CallbackDef>) {
    let stmts = relevant_children(program, block);
    let mut i = 0;
    while i < stmts.len() {
        let stmt = stmts[i];
        match &program.stmts.get(stmt).kind {
            StmtKind::CallbackStart { callback, params } => {
                if let Some(&next) = stmts.get(i + 1) {
                    if let StmtKind::CallbackImplementation { body } = &program.stmts.get(next).kind {
                        callbacks.insert(*callback, CallbackDef { params: params.clone(), body: *body });
                        collect_in_block(program, *body, callbacks);
                        i += 2;
                        continue;
                    }
                }
            }
            StmtKind::For { body, .. } | StmtKind::Loop { body } => collect_in_block(program, *body, callbacks),
            StmtKind::If { then_block, else_block, .. } => {
                collect_in_block(program, *then_block, callbacks);
                if let Some(else_block) = else_block {
                    collect_in_block(program, *else_block, callbacks);
                }
            }
            StmtKind::Switch { cases, .. } => {
                for case in cases {
                    collect_in_block(program, case.body, callbacks);
                }
            }
            _ => {}
        }
        i += 1;
    }
}
