//! Cooked tokens: logos raw tokens after interning and span attachment.

use ta_ir::{Name, Span};

/// A cooked token kind. Identifiers carry an interned [`Name`]; integer
/// literals carry their parsed value; everything else is a bare marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Main,
    Var,
    Function,
    Callback,
    Const,
    Input,
    Output,
    Call,
    For,
    In,
    Loop,
    If,
    Else,
    Switch,
    Case,
    Default,
    Break,
    Return,
    Exit,
    Checkpoint,

    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    Arrow,
    Equals,

    Identifier(Name),
    IntLiteral(i64),

    /// A byte sequence logos could not match to any rule.
    Error,
    /// Synthetic end marker appended once past the last real token, so
    /// the parser's cursor never reads past the end of the vector.
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}
