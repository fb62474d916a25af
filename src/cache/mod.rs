//! Caching subsystem
//!
//! Three pieces compose here:
//! - [`lru`]: the bounded, TTL-aware store (`LruCache`)
//! - [`key`]: deterministic, collision-resistant key derivation
//! - [`cached_stage`]: the decorator composing both around any `Stage`
//!
//! The orchestrator layers a whole-result cache (keyed by a digest of the
//! raw input text) on top of per-stage caches; both are instances of the
//! same core and are owned exclusively by one pipeline instance.

pub mod cached_stage;
pub mod key;
pub mod lru;

pub use cached_stage::CachedStage;
pub use key::{generate_key, text_digest_key};
pub use lru::{LruCache, LruCacheOptions};
