//! Tokenizer for the annotation pipeline
//!
//! Tokenization runs in two steps:
//! 1. A base character-class scan (logos, see [`raw`]) producing classified
//!    spans. Word, number, whitespace and punctuation runs already merge
//!    maximally at this level; symbols and unknown characters come out one
//!    at a time.
//! 2. Transformation passes that apply the run-merging options: unknown
//!    runs always merge, symbol runs merge only when `merge_symbols` is
//!    enabled, and word values are lower-cased when `lowercase` is enabled.
//!
//! Splitting the boundary rules out of the scan keeps the logos definition
//! vanilla and isolates the configurable behavior in small passes.
//!
//! The output is total over any input: token spans are half-open byte
//! ranges that exactly partition the source text in left-to-right order.

mod raw;

use crate::context::{Token, TokenType};
use serde::Deserialize;
use std::ops::Range;

/// Options controlling run merging and word casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TokenizerOptions {
    /// Lower-case the values of word tokens.
    pub lowercase: bool,
    /// Merge adjacent symbol characters into one token. Off by default: a
    /// symbol-to-symbol transition is a boundary.
    pub merge_symbols: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            merge_symbols: false,
        }
    }
}

/// Single-pass text tokenizer. See the module docs for the boundary rules.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    options: TokenizerOptions,
}

impl Tokenizer {
    pub fn new(options: TokenizerOptions) -> Self {
        Self { options }
    }

    /// Tokenize `text`. Total: never fails, and the returned spans
    /// partition `[0, text.len())` with no gaps or overlaps.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut spans = raw::scan(text);
        spans = merge_runs(spans, TokenType::Unknown);
        if self.options.merge_symbols {
            spans = merge_runs(spans, TokenType::Symbol);
        }

        spans
            .into_iter()
            .map(|(kind, range)| {
                let slice = &text[range.clone()];
                let value = if self.options.lowercase && kind == TokenType::Word {
                    slice.to_lowercase()
                } else {
                    slice.to_string()
                };
                Token {
                    value,
                    kind,
                    start: range.start,
                    end: range.end,
                }
            })
            .collect()
    }
}

/// Merge adjacent spans of `kind` into single spans.
fn merge_runs(
    spans: Vec<(TokenType, Range<usize>)>,
    kind: TokenType,
) -> Vec<(TokenType, Range<usize>)> {
    let mut merged: Vec<(TokenType, Range<usize>)> = Vec::with_capacity(spans.len());
    for (current_kind, range) in spans {
        if current_kind == kind {
            if let Some((last_kind, last_range)) = merged.last_mut() {
                if *last_kind == kind && last_range.end == range.start {
                    last_range.end = range.end;
                    continue;
                }
            }
        }
        merged.push((current_kind, range));
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.value.as_str()).collect()
    }

    #[test]
    fn basic_sentence() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize("Hello world!");
        assert_eq!(values(&tokens), vec!["hello", " ", "world", "!"]);
        assert_eq!(tokens[0].kind, TokenType::Word);
        assert_eq!(tokens[3].kind, TokenType::Punct);
    }

    #[test]
    fn lowercase_can_be_disabled() {
        let tokenizer = Tokenizer::new(TokenizerOptions {
            lowercase: false,
            merge_symbols: false,
        });
        let tokens = tokenizer.tokenize("Hello");
        assert_eq!(tokens[0].value, "Hello");
    }

    #[test]
    fn symbols_split_by_default() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize("a==b");
        assert_eq!(values(&tokens), vec!["a", "=", "=", "b"]);
    }

    #[test]
    fn symbols_merge_when_enabled() {
        let tokenizer = Tokenizer::new(TokenizerOptions {
            lowercase: true,
            merge_symbols: true,
        });
        let tokens = tokenizer.tokenize("a==b");
        assert_eq!(values(&tokens), vec!["a", "==", "b"]);
    }

    #[test]
    fn punctuation_runs_are_single_tokens() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize("Wait...what?!");
        assert_eq!(values(&tokens), vec!["wait", "...", "what", "?!"]);
    }

    #[test]
    fn numbers_split_from_words() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize("abc123");
        assert_eq!(values(&tokens), vec!["abc", "123"]);
        assert_eq!(tokens[1].kind, TokenType::Number);
    }

    #[test]
    fn spans_partition_input() {
        let tokenizer = Tokenizer::default();
        let text = "Pi is 3.14; send \u{00e9}mail to x@y.zz \u{1F600}?";
        let tokens = tokenizer.tokenize(text);
        let mut cursor = 0;
        for token in &tokens {
            assert_eq!(token.start, cursor, "gap or overlap at {}", cursor);
            assert!(token.end > token.start);
            cursor = token.end;
        }
        assert_eq!(cursor, text.len());
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        let tokenizer = Tokenizer::default();
        assert!(tokenizer.tokenize("").is_empty());
    }

    #[test]
    fn unknown_characters_merge_into_runs() {
        let tokenizer = Tokenizer::default();
        // Control characters fall outside every class.
        let tokens = tokenizer.tokenize("a\u{0001}\u{0002}b");
        assert_eq!(values(&tokens), vec!["a", "\u{0001}\u{0002}", "b"]);
        assert_eq!(tokens[1].kind, TokenType::Unknown);
    }
}
