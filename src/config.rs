//! Configuration surface consumed by the pipeline
//!
//! The pipeline does not load configuration itself; callers hand it a
//! `PipelineConfig` (deserialized from wherever they keep settings) and the
//! constructor builds the stage list from it. Defaults match a fully
//! enabled pipeline with a 1000-entry, 5-minute cache.

use crate::tokenizer::TokenizerOptions;
use serde::Deserialize;

/// Enable flags for the built-in stages, in their fixed run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StageToggles {
    pub enable_normalization: bool,
    pub enable_cleaning: bool,
    pub enable_extraction: bool,
    pub enable_segmentation: bool,
}

impl Default for StageToggles {
    fn default() -> Self {
        Self {
            enable_normalization: true,
            enable_cleaning: true,
            enable_extraction: true,
            enable_segmentation: true,
        }
    }
}

/// Per-detector flags for the combined extraction stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractionToggles {
    pub extract_emails: bool,
    pub extract_phones: bool,
    pub extract_urls: bool,
    pub extract_numbers: bool,
}

impl Default for ExtractionToggles {
    fn default() -> Self {
        Self {
            extract_emails: true,
            extract_phones: true,
            extract_urls: true,
            extract_numbers: true,
        }
    }
}

/// Cache sizing and expiry. Applies to the whole-result cache and to each
/// cacheable stage's wrapper cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
    /// Time-to-live in milliseconds.
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1000,
            ttl_ms: 300_000,
        }
    }
}

/// Hints for optional enrichment stages. The core never reads these except
/// to seed the context and the stage-cache key projection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: Option<String>,
    pub temperature: Option<f64>,
}

/// Static options object for one pipeline instance.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub pipeline: StageToggles,
    pub tokenizer: TokenizerOptions,
    pub cache: CacheConfig,
    pub extraction: ExtractionToggles,
    pub llm: Option<LlmConfig>,
}
