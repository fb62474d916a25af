//! Normalization stage
//!
//! Lower-cases word-token values and entity values in place, and
//! canonicalizes number-token values through a numeric round-trip so that
//! formatting variants ("007", "0.50") collapse to one canonical form.
//! Idempotent: re-running produces the same context.

use crate::context::{ProcessingContext, TokenType};
use crate::error::StageError;
use crate::stages::Stage;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeStage;

impl NormalizeStage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Stage for NormalizeStage {
    fn name(&self) -> &str {
        "normalize"
    }

    fn cacheable(&self) -> bool {
        true
    }

    async fn run(&self, mut ctx: ProcessingContext) -> Result<ProcessingContext, StageError> {
        for token in &mut ctx.data.tokens {
            match token.kind {
                TokenType::Word => token.value = token.value.to_lowercase(),
                TokenType::Number => {
                    if let Some(canonical) = canonical_number(&token.value) {
                        token.value = canonical;
                    }
                }
                _ => {}
            }
        }

        for entity in &mut ctx.data.entities {
            entity.value = entity.value.to_lowercase();
        }

        Ok(ctx)
    }
}

/// Parse-then-restringify. Returns None when the value is not a finite
/// number, leaving the original untouched.
fn canonical_number(value: &str) -> Option<String> {
    let parsed: f64 = value.parse().ok()?;
    if parsed.is_finite() {
        Some(parsed.to_string())
    } else {
        None
    }
}
