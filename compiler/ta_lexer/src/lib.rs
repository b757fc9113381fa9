//! Lexer for the TuringArena interface definition language (§4.1).
//!
//! Two stages, mirroring a raw-token → cooked-token pipeline rather than
//! hand-rolled character scanning: a `logos`-derived [`RawToken`] scan,
//! then a conversion pass that interns identifiers into [`ta_ir::Name`]s
//! and attaches byte-offset spans.

mod raw_token;
mod token;

use logos::Logos;
use ta_diagnostic::ParseError;
use ta_ir::{Span, StringInterner};

use raw_token::RawToken;
pub use token::{Token, TokenKind};

/// Lex `source` into a flat token stream, interning identifiers through
/// `interner` as they're encountered. The parser performs no semantic
/// checks, but an unrecognized byte sequence is still a hard failure —
/// there is no sensible token to recover with.
pub fn lex(source: &str, interner: &mut StringInterner) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut logos = RawToken::lexer(source);

    while let Some(result) = logos.next() {
        let range = logos.span();
        let span = Span::new(
            u32::try_from(range.start).expect("source file too large"),
            u32::try_from(range.end).expect("source file too large"),
        );
        let raw = result.map_err(|()| {
            ParseError::new(span, format!("unrecognized token `{}`", logos.slice()))
        })?;
        let kind = convert(raw, logos.slice(), interner);
        tokens.push(Token::new(kind, span));
    }

    let eof_pos = u32::try_from(source.len()).expect("source file too large");
    tokens.push(Token::new(TokenKind::Eof, Span::new(eof_pos, eof_pos)));
    Ok(tokens)
}

fn convert(raw: RawToken, slice: &str, interner: &mut StringInterner) -> TokenKind {
    match raw {
        RawToken::Main => TokenKind::Main,
        RawToken::Var => TokenKind::Var,
        RawToken::Function => TokenKind::Function,
        RawToken::Callback => TokenKind::Callback,
        RawToken::Const => TokenKind::Const,
        RawToken::Input => TokenKind::Input,
        RawToken::Output => TokenKind::Output,
        RawToken::Call => TokenKind::Call,
        RawToken::For => TokenKind::For,
        RawToken::In => TokenKind::In,
        RawToken::Loop => TokenKind::Loop,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::Switch => TokenKind::Switch,
        RawToken::Case => TokenKind::Case,
        RawToken::Default => TokenKind::Default,
        RawToken::Break => TokenKind::Break,
        RawToken::Return => TokenKind::Return,
        RawToken::Exit => TokenKind::Exit,
        RawToken::Checkpoint => TokenKind::Checkpoint,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::Equals => TokenKind::Equals,
        RawToken::Identifier => TokenKind::Identifier(interner.intern(slice)),
        RawToken::IntLiteral => {
            let value: i64 = slice.parse().expect("regex guarantees a valid integer");
            TokenKind::IntLiteral(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_keywords_and_identifiers() {
        let mut interner = StringInterner::new();
        let tokens = lex("function foo(n) -> int;", &mut interner).unwrap();
        let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
        assert!(matches!(kinds[0], TokenKind::Function));
        assert!(matches!(kinds[1], TokenKind::Identifier(_)));
        assert!(matches!(kinds.last().unwrap(), TokenKind::Eof));
    }

    #[test]
    fn lexes_negative_int_literal() {
        let mut interner = StringInterner::new();
        let tokens = lex("-12", &mut interner).unwrap();
        assert!(matches!(tokens[0].kind, TokenKind::IntLiteral(-12)));
    }

    #[test]
    fn rejects_unrecognized_byte() {
        let mut interner = StringInterner::new();
        let err = lex("var x = `bad`;", &mut interner).unwrap_err();
        assert!(err.message.contains("unrecognized token"));
    }

    #[test]
    fn skips_comments_and_whitespace() {
        let mut interner = StringInterner::new();
        let tokens = lex("// a comment\n  main { }", &mut interner).unwrap();
        assert!(matches!(tokens[0].kind, TokenKind::Main));
    }
}
