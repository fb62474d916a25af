//! Cache decorator for pipeline stages
//!
//! Wraps a stage and serves repeat invocations from an LRU cache. The key
//! is derived from the stage name plus a stable projection of the context:
//! text, token (value, type) pairs, entities, and the enrichment model and
//! temperature hints. Volatile meta fields (request id, timestamp) are
//! excluded so two runs over the same payload share an entry.
//!
//! A hit returns a deep, independent copy of the stored context, never
//! the stored value itself, so a caller mutating the result cannot
//! corrupt the cache. A miss runs the wrapped stage and stores a deep
//! copy of its output before handing the original back.

use crate::cache::key::generate_key;
use crate::cache::lru::{LruCache, LruCacheOptions};
use crate::context::ProcessingContext;
use crate::error::StageError;
use crate::stages::Stage;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

pub struct CachedStage {
    inner: Box<dyn Stage>,
    cache: Mutex<LruCache<ProcessingContext>>,
}

impl CachedStage {
    pub fn new(inner: Box<dyn Stage>, options: LruCacheOptions) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(options)),
        }
    }

    /// Number of live entries in the wrapper cache.
    pub fn cached_entries(&self) -> usize {
        self.cache.lock().unwrap().len()
    }
}

#[async_trait]
impl Stage for CachedStage {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn version(&self) -> &str {
        self.inner.version()
    }

    fn cacheable(&self) -> bool {
        self.inner.cacheable()
    }

    fn requires_setup(&self) -> bool {
        self.inner.requires_setup()
    }

    async fn setup(&self) -> Result<(), StageError> {
        self.inner.setup().await
    }

    async fn run(&self, ctx: ProcessingContext) -> Result<ProcessingContext, StageError> {
        if !self.inner.cacheable() {
            return self.inner.run(ctx).await;
        }

        let key = generate_key(self.inner.name(), &stable_projection(&ctx));

        // Each cache operation is synchronous and atomic; the lock is
        // never held across an await point.
        if let Some(hit) = self.cache.lock().unwrap().get(&key) {
            return Ok(hit);
        }

        let output = self.inner.run(ctx).await?;
        self.cache.lock().unwrap().set(key, output.clone(), None);
        Ok(output)
    }
}

/// Project the semantically stable parts of the context for key
/// derivation, dropping volatile operational fields.
fn stable_projection(ctx: &ProcessingContext) -> serde_json::Value {
    json!({
        "text": ctx.data.text,
        "tokens": ctx
            .data
            .tokens
            .iter()
            .map(|t| json!({ "value": t.value, "type": t.kind }))
            .collect::<Vec<_>>(),
        "entities": ctx.data.entities,
        "model": ctx.llm.model,
        "temperature": ctx.llm.temperature,
    })
}
