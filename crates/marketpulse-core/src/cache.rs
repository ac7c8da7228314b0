//! In-memory TTL caching for fetched pipeline results.
//!
//! The cache is an explicit object owned by the calling service and passed
//! around by reference; there is no process-wide singleton. Interactions are
//! request-driven and serialized, so no locking is needed.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default time-to-live applied to cached fetch results.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Defines how a fetch interacts with the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Read from the cache if a non-expired entry is present; otherwise fetch
    /// and store the result. (Default)
    #[default]
    Use,
    /// Always fetch, replacing any cached entry (the "force refresh" path).
    Refresh,
    /// Always fetch and leave the cache untouched.
    Bypass,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    fetched_at: Instant,
}

/// Typed key -> (timestamp, value) cache with strict TTL expiry on read.
#[derive(Debug)]
pub struct TtlCache<T> {
    map: HashMap<String, Entry<T>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            map: HashMap::new(),
            ttl,
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }

    /// Entry for `key` if present and strictly younger than the TTL.
    pub fn get(&self, key: &str) -> Option<T> {
        self.map.get(key).and_then(|entry| {
            if entry.fetched_at.elapsed() < self.ttl {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    pub fn put(&mut self, key: impl Into<String>, value: T) {
        if self.ttl.is_zero() {
            return;
        }
        self.map.insert(
            key.into(),
            Entry {
                value,
                fetched_at: Instant::now(),
            },
        );
    }

    pub fn clear_expired(&mut self) {
        let ttl = self.ttl;
        self.map.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<T: Clone> Default for TtlCache<T> {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}
