//! Property-based tests for the tokenizer
//!
//! Generated inputs mix words, numbers, punctuation, symbols, whitespace
//! and characters outside every known class. Whatever comes in, the
//! tokenizer must produce a left-to-right, gap-free, overlap-free span
//! partition of the input, and classification must be stable across runs.

use annot::{TokenType, Tokenizer, TokenizerOptions};
use proptest::prelude::*;

/// Pieces covering each character class, including multi-byte text and
/// characters that fall into no class (Unknown).
fn fragment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z]{1,8}",
        "[0-9]{1,6}",
        "[.,!?;:()]{1,4}",
        "[#$%&*+=@/]{1,3}",
        "[ \t\r\n]{1,3}",
        Just("café".to_string()),
        Just("übermäßig".to_string()),
        Just("→★".to_string()),
        Just("中文".to_string()),
        Just("αβγ".to_string()),
        Just("🎉".to_string()),
    ]
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment_strategy(), 0..12).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn spans_partition_the_input(input in text_strategy()) {
        let tokens = Tokenizer::default().tokenize(&input);
        let mut cursor = 0;
        for token in &tokens {
            prop_assert_eq!(token.start, cursor);
            prop_assert!(token.end > token.start);
            prop_assert_eq!(&input[token.start..token.end].to_lowercase(),
                &token.value.to_lowercase());
            cursor = token.end;
        }
        prop_assert_eq!(cursor, input.len());
    }

    #[test]
    fn tokenization_is_deterministic(input in text_strategy()) {
        let tokenizer = Tokenizer::default();
        prop_assert_eq!(tokenizer.tokenize(&input), tokenizer.tokenize(&input));
    }

    #[test]
    fn no_adjacent_tokens_of_a_mergeable_type(input in text_strategy()) {
        // Word, number, whitespace, punct and unknown runs merge maximally,
        // so two adjacent tokens never share one of those types.
        let tokens = Tokenizer::default().tokenize(&input);
        for pair in tokens.windows(2) {
            if pair[0].kind == pair[1].kind {
                prop_assert_eq!(pair[0].kind, TokenType::Symbol);
            }
        }
    }

    #[test]
    fn merge_symbols_collapses_symbol_runs(input in text_strategy()) {
        let merging = Tokenizer::new(TokenizerOptions {
            merge_symbols: true,
            ..TokenizerOptions::default()
        });
        let tokens = merging.tokenize(&input);
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].kind != pair[1].kind);
        }
    }

    #[test]
    fn lowercase_option_controls_word_casing(input in text_strategy()) {
        let preserved = Tokenizer::new(TokenizerOptions {
            lowercase: false,
            ..TokenizerOptions::default()
        });
        for token in preserved.tokenize(&input) {
            prop_assert_eq!(&input[token.start..token.end], &token.value);
        }
        for token in Tokenizer::default().tokenize(&input) {
            if token.kind == TokenType::Word {
                prop_assert_eq!(token.value.to_lowercase(), token.value);
            }
        }
    }
}

#[test]
fn empty_input_yields_no_tokens() {
    assert!(Tokenizer::default().tokenize("").is_empty());
}

#[test]
fn mixed_sample_classifies_as_expected() {
    let tokens = Tokenizer::default().tokenize("Call 911!");
    let kinds: Vec<TokenType> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenType::Word,
            TokenType::Whitespace,
            TokenType::Number,
            TokenType::Punct,
        ]
    );
    assert_eq!(tokens[0].value, "call");
}

#[test]
fn latin_extended_letters_are_words() {
    let tokens = Tokenizer::default().tokenize("Ærøskøbing");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenType::Word);
}

#[test]
fn extended_block_characters_are_single_symbols() {
    // CJK sits inside the extended symbol block, one scalar per token.
    let tokens = Tokenizer::default().tokenize("中文 text");
    assert_eq!(tokens[0].kind, TokenType::Symbol);
    assert_eq!(tokens[0].value, "中");
    assert_eq!(tokens[1].value, "文");
    assert_eq!(tokens[3].value, "text");
}

#[test]
fn out_of_class_characters_merge_into_unknown_runs() {
    // Greek falls between the word range and the extended symbol block.
    let tokens = Tokenizer::default().tokenize("αβγ text");
    assert_eq!(tokens[0].kind, TokenType::Unknown);
    assert_eq!(tokens[0].value, "αβγ");
    assert_eq!(tokens[2].value, "text");
}
