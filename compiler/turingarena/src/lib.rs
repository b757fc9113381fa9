//! Public entry points for compiling and running a TuringArena interface
//! definition: [`compile`] turns source text into an analyzed, driver-ready
//! [`ta_ir::Program`], and [`run`] drives that program's main block against
//! a sandboxed solution's streams, handing back an [`Iterator`] of
//! [`ta_driver::Event`] the caller can observe without touching the wire
//! protocol directly (§6 "Evaluator ↔ driver interface").

pub mod tracing_setup;

use std::io::{BufRead, Write};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use ta_diagnostic::CompileError;
use ta_driver::{DriverError, Engine, Event};
use ta_ir::Program;

pub use ta_diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use ta_ir::Program as CompiledProgram;

/// Parses and analyzes `source`, returning a program ready to drive, or the
/// first-stage failure (a grammar error, or the validator's collected
/// diagnostics).
pub fn compile(source: &str) -> Result<Program, CompileError> {
    let program = ta_parse::parse(source)?;
    match ta_analyze::analyze(program) {
        Ok(analyzed) => Ok(analyzed.program),
        Err(diagnostics) => Err(CompileError::Diagnostics(diagnostics)),
    }
}

/// A program being driven on a background thread, with its event stream
/// available to the caller as it is produced.
///
/// `Engine::run` borrows the program for its whole execution and blocks on
/// the solution's streams, so it cannot run on the calling thread without
/// the caller giving up control until completion; spawning it means the
/// `Program` has to be moved in rather than borrowed, which is why `run`
/// takes ownership instead of `&Program`.
pub struct RunHandle {
    events: mpsc::Receiver<Event>,
    handle: JoinHandle<Result<(), DriverError>>,
}

impl RunHandle {
    /// Events observed so far, in order, without blocking past whatever the
    /// engine has already produced.
    pub fn events(&self) -> impl Iterator<Item = Event> + '_ {
        self.events.try_iter()
    }

    /// Blocks until the driven run has finished, draining any remaining
    /// buffered events first, then returns the engine's own result.
    ///
    /// # Errors
    /// Returns the engine's error if the run ended on a protocol violation
    /// or a sandbox-side failure.
    pub fn finish(self) -> Result<(), DriverError> {
        for _ in self.events.iter() {}
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => Err(DriverError::Interface(ta_diagnostic::InterfaceError::Io(
                "driver thread panicked".to_string(),
            ))),
        }
    }
}

/// Runs `program`'s main block on a background thread against `reader`/
/// `writer` (the sandboxed solution's stdout/stdin, from the driver's point
/// of view) and `input` (the test data fed through `input` statements, kept
/// outside the IDL itself per §1 Non-goals).
///
/// Returns immediately with a [`RunHandle`] whose [`RunHandle::events`]
/// can be polled as the run progresses and whose [`RunHandle::finish`]
/// blocks for the final result.
pub fn run<R, W, In>(program: Program, reader: R, writer: W, input: In) -> RunHandle
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
    In: Iterator<Item = i64> + Send + 'static,
{
    let (sender, events) = mpsc::channel();
    let handle = thread::spawn(move || {
        let engine = Engine::new(&program, reader, writer, input);
        engine.run(&mut |event| {
            let _ = sender.send(event);
        })
    });
    RunHandle { events, handle }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn compiles_a_minimal_interface() {
        let program = compile(
            "function solve(n) -> int;\n\
             main {\n\
             \x20 var n;\n\
             \x20 var r;\n\
             \x20 input n;\n\
             \x20 r = call solve(n);\n\
             \x20 output r;\n\
             }\n",
        )
        .expect("should compile cleanly");
        assert_eq!(program.interface.methods.len(), 1);
    }

    #[test]
    fn rejects_source_with_semantic_errors() {
        let err = compile("main {\n  output x;\n}\n").expect_err("undeclared variable should fail");
        assert!(matches!(err, CompileError::Diagnostics(_)));
    }

    #[test]
    fn runs_and_reports_events_through_a_handle() {
        let program = compile(
            "function solve();\n\
             main {\n\
             \x20 var n;\n\
             \x20 input n;\n\
             \x20 call solve();\n\
             \x20 output n;\n\
             }\n",
        )
        .expect("should compile cleanly");

        let solution_input = "-1\n10\n";

        let handle = run(program, Cursor::new(solution_input.as_bytes().to_vec()), Vec::new(), std::iter::once(10i64));
        handle.finish().expect("run should succeed");
    }
}
