//! TTL Store Module
//!
//! Generic keyed store with lazy TTL expiration, shared by the text and image
//! caches.
//!
//! One mutex guards the whole map for the duration of each operation. Metrics
//! are recorded after the map lock is released, so the store and the metrics
//! aggregator never hold each other's locks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::debug;

use super::entry::{current_timestamp_ms, CacheEntry};
use super::lock::mutex_lock;
use super::metrics::CacheMetrics;

// == Store Stats ==
/// Point-in-time entry counts, computed by scanning the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_entries: usize,
    pub active_entries: usize,
    pub expired_entries: usize,
    pub cache_size: usize,
}

// == TTL Store ==
/// In-memory map from string keys to expiring values.
#[derive(Debug)]
pub struct TtlStore<V> {
    /// Name used in log lines and lock diagnostics
    name: &'static str,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    metrics: Arc<CacheMetrics>,
    /// Default TTL in seconds
    default_ttl: u64,
}

impl<V: Clone> TtlStore<V> {
    // == Constructor ==
    pub fn new(name: &'static str, default_ttl: u64, metrics: Arc<CacheMetrics>) -> Self {
        Self {
            name,
            entries: Mutex::new(HashMap::new()),
            metrics,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    // == Get ==
    /// Returns a copy of the value for `key` if present and not expired.
    ///
    /// An expired entry is removed on the spot and counted as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let found = {
            let mut entries = mutex_lock(&self.entries, self.name, "get");
            match entries.get(key).map(CacheEntry::is_expired) {
                Some(true) => {
                    entries.remove(key);
                    debug!(store = self.name, key, "cache expired");
                    None
                }
                Some(false) => entries.get(key).map(|entry| entry.data.clone()),
                None => None,
            }
        };

        match found {
            Some(_) => {
                debug!(store = self.name, key, "cache hit");
                self.metrics.record_hit();
            }
            None => {
                debug!(store = self.name, key, "cache miss");
                self.metrics.record_miss();
            }
        }
        found
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// `ttl` of `None` or `Some(0)` uses the store's default TTL.
    pub fn set(&self, key: String, value: V, ttl: Option<u64>) {
        let ttl = ttl.filter(|t| *t > 0).unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, ttl);
        debug!(store = self.name, key = %key, expires_at = entry.expires_at, "cache set");

        mutex_lock(&self.entries, self.name, "set").insert(key, entry);
        self.metrics.record_set();
    }

    // == Invalidate ==
    /// Removes `key`. Returns whether an entry was present.
    ///
    /// Only an actual removal counts as an invalidation.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = mutex_lock(&self.entries, self.name, "invalidate")
            .remove(key)
            .is_some();
        if removed {
            debug!(store = self.name, key, "cache invalidated");
            self.metrics.record_invalidation();
        }
        removed
    }

    // == Invalidate Prefix ==
    /// Removes every key starting with `prefix`, expired or not.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let removed = {
            let mut entries = mutex_lock(&self.entries, self.name, "invalidate_prefix");
            let before = entries.len();
            entries.retain(|key, _| !key.starts_with(prefix));
            before - entries.len()
        };

        if removed > 0 {
            debug!(store = self.name, prefix, removed, "cache prefix invalidated");
            self.metrics.record_invalidations(removed);
        }
        removed
    }

    // == Clear ==
    /// Drops every entry. Metrics are left untouched.
    pub fn clear(&self) {
        mutex_lock(&self.entries, self.name, "clear").clear();
        debug!(store = self.name, "cache cleared");
    }

    // == Stats ==
    /// Counts live and expired entries as of now.
    pub fn get_stats(&self) -> StoreStats {
        let entries = mutex_lock(&self.entries, self.name, "get_stats");
        let now = current_timestamp_ms();
        let expired_entries = entries.values().filter(|e| e.is_expired_at(now)).count();

        StoreStats {
            total_entries: entries.len(),
            active_entries: entries.len() - expired_entries,
            expired_entries,
            cache_size: entries.len(),
        }
    }

    // == Length ==
    /// Number of entries held, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        mutex_lock(&self.entries, self.name, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
