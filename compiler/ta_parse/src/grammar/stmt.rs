//! Statement and block grammar.
//!
//! A block opens with zero or more `var` declarations (which only shape
//! the variable table — they never become statement nodes themselves)
//! followed by the executable statements.

use ta_diagnostic::ParseError;
use ta_ir::{BlockId, Case, StmtId, StmtKind};
use ta_lexer::TokenKind;

use super::expr::{parse_expr, parse_expr_list, parse_expr_sequence};
use crate::cursor::Cursor;
use crate::state::ParserState;

pub(crate) fn parse_block(state: &mut ParserState, cursor: &mut Cursor) -> Result<BlockId, ParseError> {
    cursor.expect(&TokenKind::LBrace, "expected `{` to open a block")?;
    parse_var_decls(state, cursor)?;
    let mut stmts = Vec::new();
    while !cursor.check(&TokenKind::RBrace) {
        parse_stmt_into(state, cursor, &mut stmts)?;
    }
    cursor.bump();
    Ok(state.blocks.alloc(ta_ir::Block { stmts }))
}

/// Parses one source-level statement, appending one or two `StmtId`s to
/// `out`. A `callback` block is the only construct that expands to two:
/// a `CallbackStart` announcing the callback, immediately followed by
/// the `CallbackImplementation` wrapping its body.
fn parse_stmt_into(
    state: &mut ParserState,
    cursor: &mut Cursor,
    out: &mut Vec<StmtId>,
) -> Result<(), ParseError> {
    let span = cursor.current_span();
    if cursor.check(&TokenKind::Callback) {
        let (start, implementation) = parse_callback_stmt(state, cursor, span)?;
        out.push(start);
        out.push(implementation);
    } else {
        out.push(parse_stmt(state, cursor)?);
    }
    Ok(())
}

fn parse_var_decls(state: &mut ParserState, cursor: &mut Cursor) -> Result<(), ParseError> {
    while cursor.check(&TokenKind::Var) {
        cursor.bump();
        let (name, span) = parse_ident(cursor, "expected a variable name")?;
        let dimensions = parse_dimensions(cursor);
        cursor.expect(&TokenKind::Semicolon, "expected `;` after variable declaration")?;
        state.declare(name, dimensions, span);
    }
    Ok(())
}

fn parse_dimensions(cursor: &mut Cursor) -> u32 {
    let mut dims = 0u32;
    while cursor.check(&TokenKind::LBracket) {
        cursor.bump();
        let _ = cursor.expect(&TokenKind::RBracket, "expected `]`");
        dims += 1;
    }
    dims
}

fn parse_ident(cursor: &mut Cursor, message: &str) -> Result<(ta_ir::Name, ta_ir::Span), ParseError> {
    let token = cursor.current();
    match token.kind {
        TokenKind::Identifier(name) => {
            let span = token.span;
            cursor.bump();
            Ok((name, span))
        }
        _ => Err(cursor.error(message.to_string())),
    }
}

fn parse_stmt(state: &mut ParserState, cursor: &mut Cursor) -> Result<StmtId, ParseError> {
    let span = cursor.current_span();
    match cursor.current().kind {
        TokenKind::Input => {
            cursor.bump();
            let args = parse_expr_sequence(state, cursor)?;
            cursor.expect(&TokenKind::Semicolon, "expected `;` after `input`")?;
            Ok(state.stmts.alloc(StmtKind::Read { args }, span))
        }
        TokenKind::Output => {
            cursor.bump();
            let args = parse_expr_sequence(state, cursor)?;
            cursor.expect(&TokenKind::Semicolon, "expected `;` after `output`")?;
            Ok(state.stmts.alloc(StmtKind::Write { args }, span))
        }
        TokenKind::Checkpoint => {
            cursor.bump();
            cursor.expect(&TokenKind::Semicolon, "expected `;` after `checkpoint`")?;
            Ok(state.stmts.alloc(StmtKind::Checkpoint, span))
        }
        TokenKind::Break => {
            cursor.bump();
            cursor.expect(&TokenKind::Semicolon, "expected `;` after `break`")?;
            Ok(state.stmts.alloc(StmtKind::Break, span))
        }
        TokenKind::Exit => {
            cursor.bump();
            cursor.expect(&TokenKind::Semicolon, "expected `;` after `exit`")?;
            Ok(state.stmts.alloc(StmtKind::Exit, span))
        }
        TokenKind::Return => {
            cursor.bump();
            let value = if cursor.check(&TokenKind::Semicolon) {
                None
            } else {
                Some(parse_expr(state, cursor)?)
            };
            cursor.expect(&TokenKind::Semicolon, "expected `;` after `return`")?;
            Ok(state.stmts.alloc(StmtKind::Return { value }, span))
        }
        TokenKind::For => parse_for(state, cursor, span),
        TokenKind::Loop => {
            cursor.bump();
            let body = parse_block(state, cursor)?;
            Ok(state.stmts.alloc(StmtKind::Loop { body }, span))
        }
        TokenKind::If => parse_if(state, cursor, span),
        TokenKind::Switch => parse_switch(state, cursor, span),
        TokenKind::Call => parse_call(state, cursor, span, None),
        TokenKind::Identifier(_) => parse_assigned_call(state, cursor, span),
        _ => Err(cursor.error("expected a statement")),
    }
}

fn parse_for(state: &mut ParserState, cursor: &mut Cursor, span: ta_ir::Span) -> Result<StmtId, ParseError> {
    cursor.bump();
    let (name, name_span) = parse_ident(cursor, "expected a loop index name")?;
    cursor.expect(&TokenKind::In, "expected `in` after loop index")?;
    let range = parse_expr(state, cursor)?;
    state.push_scope();
    let index = state.declare(name, 0, name_span);
    let body = parse_block(state, cursor)?;
    state.pop_scope();
    Ok(state.stmts.alloc(StmtKind::For { index, range, body }, span))
}

fn parse_if(state: &mut ParserState, cursor: &mut Cursor, span: ta_ir::Span) -> Result<StmtId, ParseError> {
    cursor.bump();
    cursor.expect(&TokenKind::LParen, "expected `(` after `if`")?;
    let cond = parse_expr(state, cursor)?;
    cursor.expect(&TokenKind::RParen, "expected `)` after condition")?;
    let then_block = parse_block(state, cursor)?;
    let else_block = if cursor.eat(&TokenKind::Else) {
        Some(parse_block(state, cursor)?)
    } else {
        None
    };
    Ok(state.stmts.alloc(StmtKind::If { cond, then_block, else_block }, span))
}

fn parse_switch(state: &mut ParserState, cursor: &mut Cursor, span: ta_ir::Span) -> Result<StmtId, ParseError> {
    cursor.bump();
    cursor.expect(&TokenKind::LParen, "expected `(` after `switch`")?;
    let value = parse_expr(state, cursor)?;
    cursor.expect(&TokenKind::RParen, "expected `)` after switch value")?;
    cursor.expect(&TokenKind::LBrace, "expected `{` to open switch body")?;
    let mut cases = Vec::new();
    while cursor.check(&TokenKind::Case) {
        cases.push(parse_case(state, cursor)?);
    }
    cursor.expect(&TokenKind::RBrace, "expected `}` to close switch body")?;
    Ok(state.stmts.alloc(StmtKind::Switch { value, cases }, span))
}

fn parse_case(state: &mut ParserState, cursor: &mut Cursor) -> Result<Case, ParseError> {
    let start = cursor.current_span();
    cursor.bump();
    let mut labels = vec![parse_case_label(cursor)?];
    while cursor.eat(&TokenKind::Comma) {
        labels.push(parse_case_label(cursor)?);
    }
    let labels_span = start.cover(cursor.current_span());
    cursor.expect(&TokenKind::Colon, "expected `:` after case labels")?;
    let body = parse_block(state, cursor)?;
    Ok(Case { labels, labels_span, body })
}

/// A case label is normally an integer literal; a bare identifier is
/// still consumed (so one malformed label doesn't abort the whole
/// parse) but recorded as `None` for the validator's
/// `SwitchLabelNotLiteral` diagnostic.
fn parse_case_label(cursor: &mut Cursor) -> Result<Option<i64>, ParseError> {
    match cursor.current().kind {
        TokenKind::IntLiteral(value) => {
            cursor.bump();
            Ok(Some(value))
        }
        TokenKind::Identifier(_) => {
            cursor.bump();
            Ok(None)
        }
        _ => Err(cursor.error("expected a case label")),
    }
}

fn parse_callback_stmt(
    state: &mut ParserState,
    cursor: &mut Cursor,
    span: ta_ir::Span,
) -> Result<(StmtId, StmtId), ParseError> {
    cursor.bump();
    let (callback, _) = parse_ident(cursor, "expected a callback name")?;
    cursor.expect(&TokenKind::LParen, "expected `(` after callback name")?;
    state.push_scope();
    let mut params = Vec::new();
    if !cursor.check(&TokenKind::RParen) {
        loop {
            let (name, name_span) = parse_ident(cursor, "expected a callback parameter name")?;
            params.push(state.declare(name, 0, name_span));
            if !cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
    }
    cursor.expect(&TokenKind::RParen, "expected `)` after callback parameters")?;
    let start_stmt = state.stmts.alloc(StmtKind::CallbackStart { callback, params }, span);
    let body = parse_block(state, cursor)?;
    state.pop_scope();
    let impl_stmt = state.stmts.alloc(StmtKind::CallbackImplementation { body }, span);
    Ok((start_stmt, impl_stmt))
}

fn parse_call(
    state: &mut ParserState,
    cursor: &mut Cursor,
    span: ta_ir::Span,
    return_value: Option<ta_ir::ExprId>,
) -> Result<StmtId, ParseError> {
    cursor.bump();
    let (method, _) = parse_ident(cursor, "expected a method name")?;
    let args = parse_expr_list(state, cursor)?;
    cursor.expect(&TokenKind::Semicolon, "expected `;` after call")?;
    Ok(state.stmts.alloc(StmtKind::Call { method, args, return_value }, span))
}

/// `result = call solve(n);` — the same call statement, with the target
/// expression parsed first and threaded through as `return_value`.
fn parse_assigned_call(state: &mut ParserState, cursor: &mut Cursor, span: ta_ir::Span) -> Result<StmtId, ParseError> {
    let target = parse_expr(state, cursor)?;
    cursor.expect(&TokenKind::Equals, "expected `=` or a statement keyword")?;
    if !cursor.check(&TokenKind::Call) {
        return Err(cursor.error("expected `call` after assignment target"));
    }
    parse_call(state, cursor, span, Some(target))
}
