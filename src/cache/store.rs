//! In-memory response store with TTL expiry
//!
//! Provides a `ResponseCache` that memoizes JSON payloads keyed by request
//! signature. Expired entries are indistinguishable from missing ones and are
//! removed when observed.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde_json::Value;

/// A cached payload together with the moment it was fetched
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The cached JSON payload
    payload: Value,
    /// When the payload was fetched
    fetched_at: Instant,
}

/// In-memory cache for API responses with a fixed TTL
///
/// An entry is valid only while `fetched_at.elapsed() < ttl`; expired entries
/// are treated as absent. There is no size bound and no eviction beyond TTL
/// expiry. The map sits behind a `Mutex` so a shared client can use the cache
/// from async context; lock scopes never span an await point.
#[derive(Debug)]
pub struct ResponseCache {
    /// How long an entry remains valid after it was fetched
    ttl: Duration,
    /// Cached payloads keyed by request signature
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    /// Creates an empty cache whose entries expire after `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Looks up a payload by key
    ///
    /// Returns `None` for missing and for expired entries; an expired entry
    /// is removed on observation.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Some(entry.payload.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores a payload under the given key, stamping it with the current time
    ///
    /// An existing entry under the same key is replaced.
    pub fn insert(&self, key: &str, payload: Value) {
        self.lock().insert(
            key.to_string(),
            CacheEntry {
                payload,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Evicts all entries unconditionally
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Returns the number of non-expired entries
    pub fn len(&self) -> usize {
        let entries = self.lock();
        entries
            .values()
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .count()
    }

    /// Returns true when no non-expired entries are present
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // No panic can occur while the lock is held, so poisoning is unreachable.
        self.entries.lock().expect("cache mutex poisoned")
    }
}
