//! TTL-bounded key-value storage.
//!
//! Entries expire lazily: an entry past its deadline is evicted on the
//! access that finds it and reported as a miss. An LRU capacity bound
//! keeps the map from growing without limit.

use std::num::NonZeroUsize;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use bytes::Bytes;
use lru::LruCache;
use metrics::counter;

use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

struct Entry {
    value: Bytes,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

pub struct TtlCache {
    entries: RwLock<LruCache<String, Entry>>,
}

impl TtlCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
        }
    }

    /// Look up a key. Expired entries are evicted here and count as misses.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        let now = Instant::now();
        let mut entries = rw_write(&self.entries, SOURCE, "get");
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => {
                counter!("curio_cache_hit_total").increment(1);
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.pop(key);
                counter!("curio_cache_expired_total").increment(1);
                counter!("curio_cache_miss_total").increment(1);
                None
            }
            None => {
                counter!("curio_cache_miss_total").increment(1);
                None
            }
        }
    }

    /// Store a value under `key`, unconditionally replacing any previous
    /// entry and restarting its lifetime.
    pub fn set(&self, key: String, value: Bytes, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        let mut entries = rw_write(&self.entries, SOURCE, "set");
        if let Some((evicted_key, _)) = entries.push(key.clone(), entry) {
            if evicted_key != key {
                counter!("curio_cache_evict_total").increment(1);
            }
        }
    }

    /// Remove a key; absent keys are a no-op.
    pub fn delete(&self, key: &str) {
        rw_write(&self.entries, SOURCE, "delete").pop(key);
    }

    /// Whether a live entry exists, without refreshing its LRU position.
    pub fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        rw_read(&self.entries, SOURCE, "contains")
            .peek(key)
            .is_some_and(|entry| entry.is_live(now))
    }
}
