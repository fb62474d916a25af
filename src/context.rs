//! Core data model for the annotation pipeline
//!
//! Everything that flows through the pipeline is defined here: tokens with
//! their half-open byte spans, typed entity annotations, and the
//! `ProcessingContext` aggregate that stages transform. All types are fully
//! owned, so `Clone` produces a deep structural copy; the cache layer
//! relies on this for isolation (a caller mutating a returned context can
//! never reach into cached state).

use serde::{Deserialize, Serialize};

/// Classification assigned to each character run by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Word,
    Number,
    Punct,
    Symbol,
    Whitespace,
    Unknown,
}

/// A single token: a classified run of characters with its source span.
///
/// Spans are half-open byte ranges `[start, end)` into the source text.
/// The tokenizer guarantees tokens are emitted left-to-right and that
/// their spans exactly partition the input (no gaps, no overlaps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: TokenType,
    pub start: usize,
    pub end: usize,
}

/// A typed entity span detected in the source text.
///
/// `value` is the annotated substring (possibly normalized by a later
/// stage). Entities of different detectors may overlap (a number inside a
/// phone number is legitimate); entities of the same detector never
/// overlap after resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub start: usize,
    pub end: usize,
}

impl Entity {
    pub fn new(kind: impl Into<String>, value: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            start,
            end,
        }
    }

    /// True when `other` covers the same span with the same kind and value.
    pub fn is_duplicate_of(&self, other: &Entity) -> bool {
        self.kind == other.kind
            && self.start == other.start
            && self.end == other.end
            && self.value == other.value
    }
}

/// Operational metadata for one run. Excluded from cache-key derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaContext {
    pub request_id: String,
    pub timestamp_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Opaque short/long-term memory slots. Not touched by the core stages;
/// carried for enrichment stages that want scratch state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_term: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_term: Option<serde_json::Value>,
}

/// Model hints consumed only by optional enrichment stages. Part of the
/// stable cache-key projection because enrichment output depends on them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// The payload the core stages mutate: source text, token stream, entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayloadData {
    pub text: String,
    pub tokens: Vec<Token>,
    pub entities: Vec<Entity>,
}

/// Aggregate context threaded through every stage of one `process` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingContext {
    pub meta: MetaContext,
    #[serde(default)]
    pub memory: MemoryContext,
    #[serde(default)]
    pub llm: LlmContext,
    pub data: PayloadData,
}

impl ProcessingContext {
    /// Build a context around a payload with fresh default meta. Handy in
    /// tests and for driving a single stage outside the pipeline.
    pub fn from_payload(data: PayloadData) -> Self {
        Self {
            meta: MetaContext {
                request_id: String::new(),
                timestamp_ms: 0,
                source: None,
            },
            memory: MemoryContext::default(),
            llm: LlmContext::default(),
            data,
        }
    }

    /// Context carrying only raw text (no tokens, no entities).
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_payload(PayloadData {
            text: text.into(),
            tokens: Vec::new(),
            entities: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_is_deep() {
        let mut a = ProcessingContext::from_text("hello");
        a.data.entities.push(Entity::new("email", "x@y.zz", 0, 5));
        let b = a.clone();
        a.data.entities[0].value.push('!');
        assert_eq!(b.data.entities[0].value, "x@y.zz");
    }

    #[test]
    fn duplicate_detection_requires_full_match() {
        let a = Entity::new("phone", "+1 415 555 2671", 3, 18);
        let b = Entity::new("phone", "+1 415 555 2671", 3, 18);
        let c = Entity::new("phone", "+1 415 555 2671", 4, 18);
        assert!(a.is_duplicate_of(&b));
        assert!(!a.is_duplicate_of(&c));
    }

    #[test]
    fn token_serializes_kind_as_type() {
        let token = Token {
            value: "hi".to_string(),
            kind: TokenType::Word,
            start: 0,
            end: 2,
        };
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["type"], "word");
    }
}
