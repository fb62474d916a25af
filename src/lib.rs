//! # annot
//!
//! A deterministic text-annotation pipeline: a tokenizer feeding a chain
//! of transformation stages (normalize, clean, extract, segment) over a
//! shared processing context, with per-stage and whole-result caching and
//! lifecycle events for observation.
//!
//! The same input text always produces the same tokens and entities, so
//! every derived artifact is safely cacheable by a digest of its inputs.

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod stages;
pub mod tokenizer;

pub use cache::{generate_key, text_digest_key, CachedStage, LruCache, LruCacheOptions};
pub use config::{CacheConfig, ExtractionToggles, LlmConfig, PipelineConfig, StageToggles};
pub use context::{Entity, ProcessingContext, Token, TokenType};
pub use error::{PipelineError, StageError};
pub use events::{ErrorStage, EventData, EventHub, HandlerError, HandlerId, PipelineEvent};
pub use pipeline::{BatchOptions, Pipeline, DEFAULT_CONCURRENCY};
pub use stages::{
    CleanStage, ExtractEmailsStage, ExtractNumbersStage, ExtractPhonesStage, ExtractStage,
    ExtractUrlsStage, NormalizeStage, SegmentStage, Stage,
};
pub use tokenizer::{Tokenizer, TokenizerOptions};
