//! Expression grammar: integer literals, variable references, and
//! left-associative subscript chains.

use ta_diagnostic::ParseError;
use ta_ir::{ExprId, ExprKind};
use ta_lexer::TokenKind;

use crate::cursor::Cursor;
use crate::state::ParserState;

pub(crate) fn parse_expr(state: &mut ParserState, cursor: &mut Cursor) -> Result<ExprId, ParseError> {
    let mut expr = parse_primary(state, cursor)?;
    while cursor.check(&TokenKind::LBracket) {
        let start = state.exprs.get(expr).span;
        cursor.bump();
        let index = parse_expr(state, cursor)?;
        let close = cursor.expect(&TokenKind::RBracket, "expected `]` to close subscript")?;
        let span = start.cover(close.span);
        expr = state.exprs.alloc(ExprKind::Subscript { array: expr, index }, span);
    }
    Ok(expr)
}

fn parse_primary(state: &mut ParserState, cursor: &mut Cursor) -> Result<ExprId, ParseError> {
    let token = cursor.current();
    let span = token.span;
    match token.kind {
        TokenKind::IntLiteral(value) => {
            cursor.bump();
            Ok(state.exprs.alloc(ExprKind::IntLiteral(value), span))
        }
        TokenKind::Identifier(name) => {
            cursor.bump();
            let variable = state.resolve(name, span);
            Ok(state.exprs.alloc(ExprKind::VariableReference(variable), span))
        }
        _ => Err(cursor.error("expected an expression")),
    }
}

/// A parenthesized, comma-separated expression list: `(a, b[0], 3)`.
pub(crate) fn parse_expr_list(
    state: &mut ParserState,
    cursor: &mut Cursor,
) -> Result<Vec<ExprId>, ParseError> {
    cursor.expect(&TokenKind::LParen, "expected `(`")?;
    let mut args = Vec::new();
    if !cursor.check(&TokenKind::RParen) {
        loop {
            args.push(parse_expr(state, cursor)?);
            if !cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
    }
    cursor.expect(&TokenKind::RParen, "expected `)` to close argument list")?;
    Ok(args)
}

/// A bare comma-separated expression list with no surrounding
/// parentheses, as used after `input`/`output`: `input a, b[i];`.
pub(crate) fn parse_expr_sequence(
    state: &mut ParserState,
    cursor: &mut Cursor,
) -> Result<Vec<ExprId>, ParseError> {
    let mut exprs = vec![parse_expr(state, cursor)?];
    while cursor.eat(&TokenKind::Comma) {
        exprs.push(parse_expr(state, cursor)?);
    }
    Ok(exprs)
}
