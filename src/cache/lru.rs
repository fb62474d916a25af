//! Bounded, TTL-aware key→value store with least-recently-used eviction
//!
//! Entries are visible only while `now - stored_at <= ttl`; expired entries
//! are treated as absent and purged lazily when touched. Reads return
//! clones of the stored value, so a caller can never mutate cached state
//! through a returned reference. Expiry is measured against
//! `Instant::now()` (monotonic), never wall-clock time.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Sizing and default expiry for one cache instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LruCacheOptions {
    pub max_entries: usize,
    pub ttl: Duration,
}

impl Default for LruCacheOptions {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            ttl: Duration::from_millis(300_000),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
    ttl: Duration,
    last_used: u64,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) > self.ttl
    }
}

/// The cache core: `get`/`set`/`has`/`delete`/`clear`, bounded by
/// `max_entries` with LRU eviction when full.
#[derive(Debug)]
pub struct LruCache<V: Clone> {
    entries: HashMap<String, CacheEntry<V>>,
    max_entries: usize,
    default_ttl: Duration,
    /// Logical clock bumped on every access; drives LRU ordering.
    tick: u64,
}

impl<V: Clone> LruCache<V> {
    pub fn new(options: LruCacheOptions) -> Self {
        Self {
            entries: HashMap::new(),
            // A zero-capacity cache would evict everything on insert;
            // clamp to one entry.
            max_entries: options.max_entries.max(1),
            default_ttl: options.ttl,
            tick: 0,
        }
    }

    /// Look up `key`, returning a clone of the stored value. A hit marks
    /// the entry as most recently used.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Instant::now();
        if self.purge_if_expired(key, now) {
            return None;
        }
        self.tick += 1;
        let tick = self.tick;
        self.entries.get_mut(key).map(|entry| {
            entry.last_used = tick;
            entry.value.clone()
        })
    }

    /// Store `value` under `key`, with `ttl` overriding the default when
    /// given. Evicts the least-recently-used entry if the cache is full.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.evict_lru();
        }
        self.tick += 1;
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
                ttl: ttl.unwrap_or(self.default_ttl),
                last_used: self.tick,
            },
        );
    }

    /// True when `key` holds a live entry. Does not refresh recency.
    pub fn has(&mut self, key: &str) -> bool {
        let now = Instant::now();
        if self.purge_if_expired(key, now) {
            return false;
        }
        self.entries.contains_key(key)
    }

    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Remove `key` if its entry has expired; returns true when purged.
    fn purge_if_expired(&mut self, key: &str, now: Instant) -> bool {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                self.entries.remove(key);
                true
            }
            _ => false,
        }
    }

    fn evict_lru(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = victim {
            self.entries.remove(&key);
        }
    }
}

impl<V: Clone> Default for LruCache<V> {
    fn default() -> Self {
        Self::new(LruCacheOptions::default())
    }
}
