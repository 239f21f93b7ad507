//! Band-math scanner
//!
//! Formulas are never evaluated, so a flat token stream is enough:
//! band references, numbers, the four arithmetic operators, parentheses
//! and a couple of function names. Anything else comes out of the
//! lexer as an error span.

use std::ops::Range;

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    /// `B` followed by digits and an optional trailing letter (`B8A`)
    #[regex(r"B[0-9]+[A-Z]?", |lex| lex.slice().to_string())]
    Band(String),

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    /// Only meaningful in front of `(`
    #[regex("sqrt|abs", |lex| lex.slice().to_string())]
    Function(String),

    #[token(".")]
    Dot,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
}

/// One scanned item: a token, or a run of characters the grammar rejects
#[derive(Debug, Clone, PartialEq)]
pub enum Scanned {
    Token(Token, Range<usize>),
    Illegal(Range<usize>),
}

/// Scan a formula into tokens and illegal spans, in source order
pub fn scan(formula: &str) -> Vec<Scanned> {
    Token::lexer(formula)
        .spanned()
        .map(|(result, span)| match result {
            Ok(token) => Scanned::Token(token, span),
            Err(()) => Scanned::Illegal(span),
        })
        .collect()
}

/// Check whether `text` is exactly one band reference token
pub fn is_band_token(text: &str) -> bool {
    matches!(
        scan(text).as_slice(),
        [Scanned::Token(Token::Band(band), span)] if band == text && span.start == 0
    )
}
