//! Lexer for s-expression text using logos.
//!
//! Whitespace and `;` line comments are skipped. Numeric tokens carry
//! explicit priorities so they win over the catch-all symbol pattern at
//! equal length; a longer symbol match (e.g. `123abc`) still lexes as a
//! symbol.

use logos::Logos;

use crate::error::{ReadError, ReadErrorKind};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r";[^\n]*")]
pub(crate) enum Token {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("'")]
    Quote,
    #[token("`")]
    Quasiquote,
    #[token(",@")]
    UnquoteSplicing,
    #[token(",")]
    Unquote,
    #[token(".")]
    Dot,

    #[regex(r#""(\\.|[^"\\])*""#)]
    Str,

    #[regex(r"#\\([A-Za-z0-9]+|.)", priority = 5)]
    Char,

    #[regex(r"[+-]?[0-9]+", priority = 3)]
    Int,

    #[regex(r"[+-]?[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", priority = 4)]
    #[regex(r"[+-]?[0-9]+[eE][+-]?[0-9]+", priority = 4)]
    Float,

    #[regex(r"\|[^|]*\|")]
    PipeSym,

    #[regex(r#"[^ \t\r\n()'`,;"|\\]+"#, priority = 1)]
    Sym,
}

/// A token with its byte span in the source.
#[derive(Debug)]
pub(crate) struct SpannedToken {
    pub token: Token,
    pub start: usize,
    pub end: usize,
}

/// Lex the whole input up front.
pub(crate) fn lex(src: &str) -> Result<Vec<SpannedToken>, ReadError> {
    let mut lexer = Token::lexer(src);
    let mut out = Vec::new();
    while let Some(item) = lexer.next() {
        let span = lexer.span();
        match item {
            Ok(token) => out.push(SpannedToken {
                token,
                start: span.start,
                end: span.end,
            }),
            Err(()) => return Err(ReadError::new(ReadErrorKind::Lex, span.start)),
        }
    }
    Ok(out)
}
