//! Pipeline stages
//!
//! A stage is a named, versioned, optionally cacheable transform from one
//! processing context to another. The orchestrator holds stages behind
//! this trait and never inspects concrete stage identity except by name
//! for caching and event payloads. Built-in stages:
//! normalize → clean → extract → segment, in that run order.

pub mod clean;
pub mod extract;
pub mod normalize;
pub mod segment;

pub use clean::CleanStage;
pub use extract::{
    ExtractEmailsStage, ExtractNumbersStage, ExtractPhonesStage, ExtractStage, ExtractUrlsStage,
};
pub use normalize::NormalizeStage;
pub use segment::SegmentStage;

use crate::context::ProcessingContext;
use crate::error::StageError;
use async_trait::async_trait;

/// The uniform stage contract.
///
/// Stages are stateless aside from configuration captured at construction:
/// `run` takes the context by value and returns the transformed context.
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> &str {
        "1.0.0"
    }

    /// Whether the orchestrator may wrap this stage in a cache.
    fn cacheable(&self) -> bool {
        false
    }

    /// Whether this stage needs one-time asynchronous setup before its
    /// first run (e.g. an enrichment adapter opening a connection).
    fn requires_setup(&self) -> bool {
        false
    }

    /// One-time setup hook, awaited once per pipeline before the first
    /// run. Failure is logged by the orchestrator and the stage skipped;
    /// it never fails the run.
    async fn setup(&self) -> Result<(), StageError> {
        Ok(())
    }

    async fn run(&self, ctx: ProcessingContext) -> Result<ProcessingContext, StageError>;
}
