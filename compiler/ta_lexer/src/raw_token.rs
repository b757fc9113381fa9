//! Raw token definition: the logos-derived scanner output, before
//! identifier interning and span conversion.

use logos::Logos;

/// Raw token from logos, carrying only its lexeme shape — no interning,
/// no span (logos tracks the byte range separately via `Lexer::span`).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub(crate) enum RawToken {
    #[token("main")]
    Main,
    #[token("var")]
    Var,
    #[token("function")]
    Function,
    #[token("callback")]
    Callback,
    #[token("const")]
    Const,
    #[token("input")]
    Input,
    #[token("output")]
    Output,
    #[token("call")]
    Call,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("loop")]
    Loop,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("break")]
    Break,
    #[token("return")]
    Return,
    #[token("exit")]
    Exit,
    #[token("checkpoint")]
    Checkpoint,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("->")]
    Arrow,
    #[token("=")]
    Equals,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", priority = 1)]
    Identifier,
    #[regex(r"-?[0-9]+")]
    IntLiteral,
}
