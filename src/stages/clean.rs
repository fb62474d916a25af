//! Cleanup stage
//!
//! Drops punctuation and whitespace tokens from the token stream and
//! removes entities whose trimmed value is empty. Idempotent.

use crate::context::{ProcessingContext, TokenType};
use crate::error::StageError;
use crate::stages::Stage;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, Default)]
pub struct CleanStage;

impl CleanStage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Stage for CleanStage {
    fn name(&self) -> &str {
        "clean"
    }

    fn cacheable(&self) -> bool {
        true
    }

    async fn run(&self, mut ctx: ProcessingContext) -> Result<ProcessingContext, StageError> {
        ctx.data
            .tokens
            .retain(|token| !matches!(token.kind, TokenType::Punct | TokenType::Whitespace));
        ctx.data
            .entities
            .retain(|entity| !entity.value.trim().is_empty());
        Ok(ctx)
    }
}
