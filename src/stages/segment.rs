//! Sentence segmentation stage
//!
//! Scans the text once. At each sentence-ending punctuation character
//! (`.`, `!`, `?`):
//! 1. a decimal point flanked by digits on both sides is skipped;
//! 2. a run of consecutive sentence punctuation collapses into one
//!    boundary candidate;
//! 3. looking past trailing whitespace, a boundary is declared when
//!    end-of-text is reached, when whitespace was consumed, or when the
//!    next character looks like a sentence starter (uppercase letter,
//!    quote, or opening bracket).
//!
//! The starter rule keeps abbreviations followed immediately by a capital
//! from splitting; its character class is a heuristic and is configurable
//! on the stage rather than load-bearing. A trailing segment without
//! terminal punctuation is still emitted when non-empty.

use crate::context::{Entity, ProcessingContext};
use crate::error::StageError;
use crate::stages::Stage;
use async_trait::async_trait;

const DEFAULT_STARTER_CHARS: &[char] = &['"', '\'', '(', '[', '{'];

#[derive(Debug, Clone)]
pub struct SegmentStage {
    starter_chars: Vec<char>,
}

impl SegmentStage {
    pub fn new() -> Self {
        Self {
            starter_chars: DEFAULT_STARTER_CHARS.to_vec(),
        }
    }

    /// Override the punctuation/bracket characters treated as sentence
    /// starters. Uppercase letters always count.
    pub fn with_starter_chars(starter_chars: Vec<char>) -> Self {
        Self { starter_chars }
    }

    fn is_sentence_starter(&self, c: char) -> bool {
        c.is_uppercase() || self.starter_chars.contains(&c)
    }

    fn segment(&self, text: &str, entities: &mut Vec<Entity>) {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let n = chars.len();
        let mut segment_start = 0usize;
        let mut i = 0usize;

        while i < n {
            let c = chars[i].1;
            if !matches!(c, '.' | '!' | '?') {
                i += 1;
                continue;
            }

            // Decimal point, not a sentence boundary.
            if c == '.'
                && i > 0
                && i + 1 < n
                && chars[i - 1].1.is_ascii_digit()
                && chars[i + 1].1.is_ascii_digit()
            {
                i += 1;
                continue;
            }

            // Collapse the punctuation run into one candidate.
            let mut run_end = i + 1;
            while run_end < n && matches!(chars[run_end].1, '.' | '!' | '?') {
                run_end += 1;
            }

            let mut after_ws = run_end;
            while after_ws < n && chars[after_ws].1.is_whitespace() {
                after_ws += 1;
            }
            let consumed_whitespace = after_ws > run_end;

            let boundary = after_ws >= n
                || consumed_whitespace
                || self.is_sentence_starter(chars[after_ws].1);

            if boundary {
                let end = if run_end < n { chars[run_end].0 } else { text.len() };
                push_sentence(text, segment_start, end, entities);
                segment_start = if after_ws < n { chars[after_ws].0 } else { text.len() };
                i = after_ws;
            } else {
                i = run_end;
            }
        }

        if segment_start < text.len() {
            push_sentence(text, segment_start, text.len(), entities);
        }
    }
}

impl Default for SegmentStage {
    fn default() -> Self {
        Self::new()
    }
}

/// Emit the trimmed substring as a sentence entity carrying the original
/// (untrimmed) span bounds. Whitespace-only segments are dropped.
fn push_sentence(text: &str, start: usize, end: usize, entities: &mut Vec<Entity>) {
    let value = text[start..end].trim();
    if !value.is_empty() {
        entities.push(Entity::new("sentence", value, start, end));
    }
}

#[async_trait]
impl Stage for SegmentStage {
    fn name(&self) -> &str {
        "segment"
    }

    fn cacheable(&self) -> bool {
        true
    }

    async fn run(&self, mut ctx: ProcessingContext) -> Result<ProcessingContext, StageError> {
        let mut entities = Vec::new();
        self.segment(&ctx.data.text, &mut entities);
        ctx.data.entities.extend(entities);
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn sentences(text: &str) -> Vec<String> {
        let out = SegmentStage::new()
            .run(ProcessingContext::from_text(text))
            .await
            .unwrap();
        out.data
            .entities
            .iter()
            .filter(|e| e.kind == "sentence")
            .map(|e| e.value.clone())
            .collect()
    }

    #[tokio::test]
    async fn splits_on_terminal_punctuation() {
        assert_eq!(
            sentences("First one. Second one! Third?").await,
            vec!["First one.", "Second one!", "Third?"]
        );
    }

    #[tokio::test]
    async fn decimal_point_is_not_a_boundary() {
        assert_eq!(
            sentences("Pi is 3.14 and growing.").await,
            vec!["Pi is 3.14 and growing."]
        );
    }

    #[tokio::test]
    async fn ellipsis_collapses_into_one_candidate() {
        assert_eq!(
            sentences("Wait...what?Yes.").await,
            vec!["Wait...what?", "Yes."]
        );
    }

    #[tokio::test]
    async fn trailing_segment_without_punctuation_is_emitted() {
        assert_eq!(
            sentences("Done. And then some").await,
            vec!["Done.", "And then some"]
        );
    }

    #[tokio::test]
    async fn lowercase_after_punct_without_space_is_not_a_boundary() {
        // e.g. a file extension or abbreviation run into the next word
        assert_eq!(sentences("see file.txt for details").await, vec![
            "see file.txt for details"
        ]);
    }

    #[tokio::test]
    async fn spans_are_untrimmed_but_values_are_trimmed() {
        let out = SegmentStage::new()
            .run(ProcessingContext::from_text("One.  Two."))
            .await
            .unwrap();
        let first = &out.data.entities[0];
        assert_eq!(first.value, "One.");
        assert_eq!((first.start, first.end), (0, 4));
        let second = &out.data.entities[1];
        assert_eq!(second.value, "Two.");
        assert_eq!((second.start, second.end), (6, 10));
    }

    #[tokio::test]
    async fn empty_and_whitespace_inputs_emit_nothing() {
        assert!(sentences("").await.is_empty());
        assert!(sentences("   ").await.is_empty());
    }

    #[tokio::test]
    async fn quote_counts_as_sentence_starter() {
        assert_eq!(
            sentences(r#"He said."Go now" was all."#).await,
            vec![r#"He said."#, r#""Go now" was all."#]
        );
    }
}
