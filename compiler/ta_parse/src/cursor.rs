//! Token cursor for the recursive-descent parser.

use ta_diagnostic::ParseError;
use ta_ir::Span;
use ta_lexer::{Token, TokenKind};

/// Navigates a borrowed token stream, one token of lookahead at a time.
/// The last token is always [`TokenKind::Eof`], so `current()` never
/// indexes out of bounds.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)));
        Cursor { tokens, pos: 0 }
    }

    #[must_use]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    #[must_use]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    #[must_use]
    pub fn at_eof(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    /// Advance past the current token and return it.
    pub fn bump(&mut self) -> Token {
        let token = *self.current();
        if !matches!(token.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    #[must_use]
    pub fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    /// Consume the current token if it matches `kind`'s shape.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token, failing with `message` if it doesn't
    /// match `kind`'s shape.
    pub fn expect(&mut self, kind: &TokenKind, message: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.bump())
        } else {
            Err(ParseError::new(self.current_span(), message.to_string()))
        }
    }

    pub fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.current_span(), message.into())
    }
}
