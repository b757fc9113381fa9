//! Top-level grammar: constants, method/callback prototypes, and the
//! `main` block that drives execution.

use ta_diagnostic::ParseError;
use ta_ir::{CallbackPrototype, Constant, InterfaceDefinition, MethodPrototype};
use ta_lexer::TokenKind;

use super::stmt::parse_block;
use crate::cursor::Cursor;
use crate::state::ParserState;

pub(crate) fn parse_interface(
    state: &mut ParserState,
    cursor: &mut Cursor,
) -> Result<InterfaceDefinition, ParseError> {
    let mut methods = Vec::new();
    let mut callbacks = Vec::new();
    let mut constants = Vec::new();

    loop {
        match cursor.current().kind {
            TokenKind::Const => constants.push(parse_const(cursor)?),
            TokenKind::Function => methods.push(parse_method(state, cursor)?),
            TokenKind::Callback => callbacks.push(parse_callback_prototype(state, cursor)?),
            TokenKind::Main => break,
            _ => return Err(cursor.error("expected `const`, `function`, `callback`, or `main`")),
        }
    }

    cursor.bump();
    let main_block = parse_block(state, cursor)?;
    Ok(InterfaceDefinition { methods, callbacks, constants, main_block })
}

fn parse_const(cursor: &mut Cursor) -> Result<Constant, ParseError> {
    let span = cursor.current_span();
    cursor.bump();
    let (name, _) = parse_ident_here(cursor)?;
    cursor.expect(&TokenKind::Equals, "expected `=` in constant declaration")?;
    let value = parse_int_literal(cursor)?;
    cursor.expect(&TokenKind::Semicolon, "expected `;` after constant declaration")?;
    Ok(Constant { name, value, span })
}

fn parse_method(state: &mut ParserState, cursor: &mut Cursor) -> Result<MethodPrototype, ParseError> {
    cursor.bump();
    let (name, name_span) = parse_ident_here(cursor)?;
    let parameters = parse_param_list(state, cursor)?;
    let has_return_value = parse_optional_return_type(cursor)?;

    let callbacks = if cursor.eat(&TokenKind::LBrace) {
        let mut callbacks = Vec::new();
        while !cursor.check(&TokenKind::RBrace) {
            callbacks.push(parse_callback_prototype(state, cursor)?);
        }
        cursor.bump();
        callbacks
    } else {
        cursor.expect(&TokenKind::Semicolon, "expected `;` or `{` after method prototype")?;
        Vec::new()
    };

    Ok(MethodPrototype { name, name_span, parameters, has_return_value, callbacks })
}

fn parse_callback_prototype(
    state: &mut ParserState,
    cursor: &mut Cursor,
) -> Result<CallbackPrototype, ParseError> {
    cursor.bump();
    let (name, name_span) = parse_ident_here(cursor)?;
    let parameters = parse_param_list(state, cursor)?;
    let has_return_value = parse_optional_return_type(cursor)?;
    cursor.expect(&TokenKind::Semicolon, "expected `;` after callback prototype")?;
    Ok(CallbackPrototype { name, name_span, parameters, has_return_value })
}

fn parse_param_list(
    state: &mut ParserState,
    cursor: &mut Cursor,
) -> Result<Vec<ta_ir::VariableId>, ParseError> {
    cursor.expect(&TokenKind::LParen, "expected `(` after name")?;
    let mut params = Vec::new();
    if !cursor.check(&TokenKind::RParen) {
        loop {
            let (name, name_span) = parse_ident_here(cursor)?;
            let mut dims = 0u32;
            while cursor.check(&TokenKind::LBracket) {
                cursor.bump();
                cursor.expect(&TokenKind::RBracket, "expected `]`")?;
                dims += 1;
            }
            params.push(state.declare_unscoped(name, dims, name_span));
            if !cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
    }
    cursor.expect(&TokenKind::RParen, "expected `)` to close parameter list")?;
    Ok(params)
}

fn parse_optional_return_type(cursor: &mut Cursor) -> Result<bool, ParseError> {
    if cursor.eat(&TokenKind::Arrow) {
        let _ = parse_ident_here(cursor)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

fn parse_ident_here(cursor: &mut Cursor) -> Result<(ta_ir::Name, ta_ir::Span), ParseError> {
    let token = cursor.current();
    match token.kind {
        TokenKind::Identifier(name) => {
            let span = token.span;
            cursor.bump();
            Ok((name, span))
        }
        _ => Err(cursor.error("expected an identifier")),
    }
}

fn parse_int_literal(cursor: &mut Cursor) -> Result<i64, ParseError> {
    let token = cursor.current();
    match token.kind {
        TokenKind::IntLiteral(value) => {
            cursor.bump();
            Ok(value)
        }
        _ => Err(cursor.error("expected an integer literal")),
    }
}
