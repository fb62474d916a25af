//! Base character-class scan for the tokenizer
//!
//! The raw scan is handled entirely by logos: word, number, whitespace and
//! punctuation runs merge maximally at this level, while symbol characters
//! come out one scalar at a time (symbol-to-symbol transitions are run
//! boundaries unless symbol merging is enabled, which is applied as a
//! transformation pass by the caller). Anything outside the known classes
//! falls out of the lexer as an error and is mapped to `Unknown` here.

use crate::context::TokenType;
use logos::Logos;
use std::ops::Range;

/// Character-class tokens produced by the base scan.
///
/// Punctuation wins over the general symbol ranges for the sentence
/// punctuation set; the explicit priorities encode that precedence.
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
pub enum RawToken {
    /// ASCII letters plus the Extended Latin range.
    #[regex(r"[A-Za-z\u{0080}-\u{024F}]+")]
    Word,

    #[regex(r"[0-9]+")]
    Number,

    #[regex(r"[ \t\n\r]+")]
    Whitespace,

    /// Sentence punctuation runs: `. , ! ? ; : ( ) [ ] { } " ' \``
    #[regex(r#"[.,!?;:()\[\]{}"'`]+"#, priority = 3)]
    Punct,

    /// One scalar from the remaining ASCII punctuation ranges or the
    /// extended symbol block.
    #[regex(r"[\x21-\x2f\x3a-\x40\x5b-\x60\x7b-\x7e]|[\u{2008}-\u{1FBCF}]", priority = 2)]
    Symbol,
}

impl RawToken {
    fn token_type(self) -> TokenType {
        match self {
            RawToken::Word => TokenType::Word,
            RawToken::Number => TokenType::Number,
            RawToken::Whitespace => TokenType::Whitespace,
            RawToken::Punct => TokenType::Punct,
            RawToken::Symbol => TokenType::Symbol,
        }
    }
}

/// Scan `text` into classified spans covering the whole input.
///
/// Lexer errors (characters outside every class) become `Unknown` spans;
/// consecutive unknown spans are not merged here.
pub(crate) fn scan(text: &str) -> Vec<(TokenType, Range<usize>)> {
    let mut lexer = RawToken::lexer(text);
    let mut spans = Vec::new();

    while let Some(result) = lexer.next() {
        let kind = match result {
            Ok(token) => token.token_type(),
            Err(()) => TokenType::Unknown,
        };
        spans.push((kind, lexer.span()));
    }

    spans
}
