//! Driver engine for compiled TuringArena interfaces (§4.6, §6): given an
//! analyzed [`ta_ir::Program`] and a pair of streams connected to a
//! sandboxed solution process, runs the main block to completion,
//! emitting [`Event`]s an evaluator can observe without having to parse
//! the wire protocol itself.

mod bindings;
mod engine;
mod error;
mod wire;

pub use bindings::{Bindings, Frame, Value};
pub use engine::{Engine, Event};
pub use error::DriverError;
pub use wire::{CallbackSignature, Decoder, Encoder, Request, WireValue};

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Parses and analyzes `source`, so the engine always sees a program
    /// with its resolution nodes already synthesized — same as every real
    /// caller reaches it through `turingarena::compile`.
    fn parse(source: &str) -> ta_ir::Program {
        let program = ta_parse::parse(source).expect("source should parse");
        ta_analyze::analyze(program).expect("program should analyze cleanly").program
    }

    /// A method with no callbacks and no return value, driven by a single
    /// `input`/`call`/`output` round trip: the engine forwards the test
    /// input downward, the solution echoes it back up.
    #[test]
    fn runs_a_minimal_call_round_trip() {
        let program = parse(
            "function solve();\n\
             main {\n\
             \x20 var n;\n\
             \x20 input n;\n\
             \x20 call solve();\n\
             \x20 output n;\n\
             }\n",
        );

        // The solution side of the stream: signals it raised no callbacks
        // for the `call`, then writes a value on its own stdout for the
        // `output` step to pick up.
        let solution_input = "-1\n10\n";
        let mut solution_output = Vec::new();

        let engine = Engine::new(
            &program,
            Cursor::new(solution_input.as_bytes()),
            &mut solution_output,
            std::iter::once(10i64),
        );

        let mut events = Vec::new();
        engine.run(&mut |event| events.push(format!("{event:?}"))).expect("run should succeed");

        assert!(events.iter().any(|e| e.contains("Call")));
        assert!(events.iter().any(|e| e.contains("MethodReturned")));

        let written = String::from_utf8(solution_output).expect("output should be utf8");
        assert!(written.contains("method_call"));
        assert!(written.contains("10"));
    }
}
