//! Pipeline orchestrator
//!
//! Owns the tokenizer, the ordered stage list (cacheable stages wrapped in
//! [`CachedStage`] when caching is enabled), a whole-result cache keyed by
//! a digest of the raw input text, and the lifecycle event hub.
//!
//! One `process` call moves through: lookup (whole-result cache) →
//! tokenize → run each stage in configured order → store → return. A
//! cache hit short-circuits after lookup but still emits RunStart/RunEnd
//! with zero duration, so observers always see a complete run envelope.
//!
//! Stages needing one-time asynchronous setup (enrichment adapters) are
//! awaited once before the first run. A setup failure is logged and those
//! stages are skipped; it never fails the run.

mod batch;

pub use batch::{BatchOptions, DEFAULT_CONCURRENCY};

use crate::cache::{text_digest_key, CachedStage, LruCache, LruCacheOptions};
use crate::config::PipelineConfig;
use crate::context::{LlmContext, MemoryContext, MetaContext, PayloadData, ProcessingContext};
use crate::error::PipelineError;
use crate::events::{ErrorStage, EventData, EventHub, HandlerError, HandlerId, PipelineEvent};
use crate::stages::{CleanStage, ExtractStage, NormalizeStage, SegmentStage, Stage};
use crate::tokenizer::Tokenizer;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::OnceCell;

/// Key prefix for whole-result cache entries.
const RESULT_CACHE_PREFIX: &str = "pipeline";

pub struct Pipeline {
    tokenizer: Tokenizer,
    stages: Vec<Box<dyn Stage>>,
    result_cache: Option<Mutex<LruCache<ProcessingContext>>>,
    hub: EventHub,
    config: PipelineConfig,
    request_counter: AtomicU64,
    /// One-time enrichment setup outcome; true when all setups succeeded.
    enrichment_ready: OnceCell<bool>,
}

impl Pipeline {
    /// Pipeline with the default configuration: normalize → clean →
    /// extract → segment, caching enabled.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        let result_cache = if config.cache.enabled {
            Some(Mutex::new(LruCache::new(cache_options(&config))))
        } else {
            None
        };

        let mut pipeline = Self {
            tokenizer: Tokenizer::new(config.tokenizer),
            stages: Vec::new(),
            result_cache,
            hub: EventHub::new(),
            config,
            request_counter: AtomicU64::new(0),
            enrichment_ready: OnceCell::new(),
        };

        let toggles = pipeline.config.pipeline;
        if toggles.enable_normalization {
            pipeline.push_stage(Box::new(NormalizeStage::new()));
        }
        if toggles.enable_cleaning {
            pipeline.push_stage(Box::new(CleanStage::new()));
        }
        if toggles.enable_extraction {
            pipeline.push_stage(Box::new(ExtractStage::new(pipeline.config.extraction)));
        }
        if toggles.enable_segmentation {
            pipeline.push_stage(Box::new(SegmentStage::new()));
        }

        pipeline
    }

    /// Append a custom stage after the built-in ones. Cacheable stages are
    /// wrapped in a stage cache when caching is enabled.
    pub fn add_stage(&mut self, stage: Box<dyn Stage>) -> &mut Self {
        self.push_stage(stage);
        self
    }

    /// Register an event handler; the returned id unregisters it.
    pub fn on<F>(&mut self, event: PipelineEvent, handler: F) -> HandlerId
    where
        F: Fn(&EventData<'_>) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.hub.on(event, handler)
    }

    pub fn off(&mut self, event: PipelineEvent, id: HandlerId) -> bool {
        self.hub.off(event, id)
    }

    /// Names of the configured stages, in run order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Process one text through the full pipeline.
    pub async fn process(&self, text: &str) -> Result<ProcessingContext, PipelineError> {
        let enrichment_ready = *self
            .enrichment_ready
            .get_or_init(|| self.run_enrichment_setup())
            .await;

        let result_key = text_digest_key(RESULT_CACHE_PREFIX, text);
        if let Some(cache) = &self.result_cache {
            let hit = cache.lock().unwrap().get(&result_key);
            if let Some(ctx) = hit {
                self.hub.emit(&EventData::RunStart { context: &ctx });
                self.hub.emit(&EventData::RunEnd {
                    context: &ctx,
                    duration: Duration::ZERO,
                });
                return Ok(ctx);
            }
        }

        let run_started = Instant::now();
        let mut ctx = self.build_context(text);
        self.hub.emit(&EventData::RunStart { context: &ctx });

        for stage in &self.stages {
            if stage.requires_setup() && !enrichment_ready {
                log::warn!("skipping stage '{}': setup failed", stage.name());
                continue;
            }

            self.hub.emit(&EventData::ProcessorStart {
                name: stage.name(),
                context: &ctx,
            });
            let stage_started = Instant::now();

            match stage.run(ctx.clone()).await {
                Ok(next) => {
                    ctx = next;
                    self.hub.emit(&EventData::ProcessorEnd {
                        name: stage.name(),
                        context: &ctx,
                        duration: stage_started.elapsed(),
                    });
                }
                Err(source) => {
                    let err = PipelineError::Stage {
                        stage: stage.name().to_string(),
                        source,
                    };
                    self.hub.emit(&EventData::Error {
                        error: &err,
                        context: Some(&ctx),
                        stage: ErrorStage::Run,
                    });
                    return Err(err);
                }
            }
        }

        if let Some(cache) = &self.result_cache {
            cache.lock().unwrap().set(result_key, ctx.clone(), None);
        }

        self.hub.emit(&EventData::RunEnd {
            context: &ctx,
            duration: run_started.elapsed(),
        });
        Ok(ctx)
    }

    fn push_stage(&mut self, stage: Box<dyn Stage>) {
        let stage: Box<dyn Stage> = if self.config.cache.enabled && stage.cacheable() {
            Box::new(CachedStage::new(stage, cache_options(&self.config)))
        } else {
            stage
        };
        self.stages.push(stage);
    }

    async fn run_enrichment_setup(&self) -> bool {
        for stage in &self.stages {
            if stage.requires_setup() {
                if let Err(err) = stage.setup().await {
                    log::warn!(
                        "setup for stage '{}' failed, continuing without it: {}",
                        stage.name(),
                        err
                    );
                    return false;
                }
            }
        }
        true
    }

    fn build_context(&self, text: &str) -> ProcessingContext {
        let tokens = self.tokenizer.tokenize(text);
        let request_id = format!(
            "req-{}",
            self.request_counter.fetch_add(1, Ordering::Relaxed) + 1
        );
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0);
        let llm = self
            .config
            .llm
            .as_ref()
            .map(|hints| LlmContext {
                model: hints.model.clone(),
                temperature: hints.temperature,
            })
            .unwrap_or_default();

        ProcessingContext {
            meta: MetaContext {
                request_id,
                timestamp_ms,
                source: None,
            },
            memory: MemoryContext::default(),
            llm,
            data: PayloadData {
                text: text.to_string(),
                tokens,
                entities: Vec::new(),
            },
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn cache_options(config: &PipelineConfig) -> LruCacheOptions {
    LruCacheOptions {
        max_entries: config.cache.max_entries,
        ttl: Duration::from_millis(config.cache.ttl_ms),
    }
}
