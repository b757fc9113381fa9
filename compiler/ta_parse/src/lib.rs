//! Recursive-descent parser for the TuringArena interface definition
//! language (§4.1).
//!
//! Performs no semantic checks: a reference to an undeclared variable,
//! an out-of-place `break`, or a non-literal `switch` label are all
//! accepted here and left for `ta_analyze`'s validator to report. The
//! only thing that aborts parsing is malformed syntax.

mod cursor;
mod grammar;
mod state;

use ta_diagnostic::ParseError;
use ta_ir::{Program, StringInterner};
use ta_lexer::Token;

use cursor::Cursor;
use state::ParserState;

/// Parse a full interface source file, already lexed, into a [`Program`].
/// Takes ownership of `interner` since identifiers discovered while
/// parsing (`var` names, loop indices, callback parameters) are interned
/// into the same table the lexer used for source identifiers.
pub fn parse_program(tokens: &[Token], interner: StringInterner) -> Result<Program, ParseError> {
    let mut state = ParserState::new(interner);
    let mut cursor = Cursor::new(tokens);
    let interface = grammar::parse_interface(&mut state, &mut cursor)?;
    if !cursor.at_eof() {
        return Err(cursor.error("expected end of input"));
    }
    Ok(Program {
        interner: state.interner,
        variables: state.variables,
        exprs: state.exprs,
        stmts: state.stmts,
        blocks: state.blocks,
        interface,
    })
}

/// Lex and parse `source` in one step.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let mut interner = StringInterner::new();
    let tokens = ta_lexer::lex(source, &mut interner)?;
    parse_program(&tokens, interner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_interface() {
        let source = "function solve(n) -> int;\nmain {\n  var n;\n  var r;\n  input n;\n  r = call solve(n);\n  output r;\n}\n";
        let program = parse(source);
        assert!(program.is_ok(), "{:?}", program.err());
    }

    #[test]
    fn parses_for_loop_and_array_subscript() {
        let source = "main {\n  var a[];\n  input n;\n  for i in n {\n    input a[i];\n  }\n}\n";
        let program = parse(source).unwrap();
        assert_eq!(program.blocks.get(program.interface.main_block).stmts.len(), 2);
    }

    #[test]
    fn parses_callback_block_as_two_statements() {
        let source =
            "callback report(x);\nmain {\n  callback report(x) {\n    output x;\n  }\n}\n";
        let program = parse(source).unwrap();
        assert_eq!(program.blocks.get(program.interface.main_block).stmts.len(), 2);
    }

    #[test]
    fn rejects_malformed_syntax() {
        let source = "main { input }";
        assert!(parse(source).is_err());
    }

    #[test]
    fn parses_switch_with_non_literal_label() {
        let source = "main {\n  var x;\n  input x;\n  switch (x) {\n    case n: { output x; }\n  }\n}\n";
        assert!(parse(source).is_ok());
    }
}
