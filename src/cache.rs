//! Contenthash cache.
//!
//! ENS contenthash lookups cost two `eth_call` round trips, so resolved
//! hashes are kept in a simple in-memory TTL cache keyed by name.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock},
    time::{Duration, SystemTime},
};

use log::debug;

/// Interval for cleaning up expired cache entries.
pub const CACHE_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Global cache instance.
pub static CACHE: OnceLock<ContentHashCache> = OnceLock::new();

/// An entry in the contenthash cache.
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Raw contenthash bytes as returned by the resolver contract.
    contenthash: Vec<u8>,
    /// When this entry was added to the cache.
    inserted: SystemTime,
}

/// Cache of resolved ENS contenthashes.
#[derive(Debug, Clone)]
pub struct ContentHashCache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    /// Seconds an entry stays valid.
    ttl: u64,
}

impl ContentHashCache {
    /// Create a new cache whose entries expire after `ttl` seconds.
    pub fn new(ttl: u64) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Get the cached contenthash for a name, if present and fresh.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        let cache = self.entries.lock().unwrap();
        cache.get(name).and_then(|entry| {
            let fresh = entry
                .inserted
                .elapsed()
                .map(|age| age.as_secs() <= self.ttl)
                .unwrap_or(true);
            fresh.then(|| entry.contenthash.clone())
        })
    }

    /// Add or update a name in the cache.
    pub fn set(&self, name: String, contenthash: Vec<u8>) {
        let mut cache = self.entries.lock().unwrap();
        cache.insert(
            name,
            CacheEntry {
                contenthash,
                inserted: SystemTime::now(),
            },
        );
    }

    /// Remove expired entries from the cache.
    pub fn cleanup(&self) {
        let mut cache = self.entries.lock().unwrap();
        cache.retain(|_, entry| {
            entry
                .inserted
                .elapsed()
                .map(|age| age.as_secs() <= self.ttl)
                .unwrap_or(true)
        });
        debug!("Cache cleanup completed, {} entries remain", cache.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_returns_entries() {
        let cache = ContentHashCache::new(60);
        assert_eq!(cache.get("vitalik.eth."), None);
        cache.set("vitalik.eth.".into(), vec![0xE3, 0x01]);
        assert_eq!(cache.get("vitalik.eth."), Some(vec![0xE3, 0x01]));
    }

    #[test]
    fn expired_entries_are_not_returned() {
        let cache = ContentHashCache::new(0);
        cache.set("stale.eth.".into(), vec![1]);
        std::thread::sleep(Duration::from_millis(1100));
        assert_eq!(cache.get("stale.eth."), None);
        cache.cleanup();
        assert!(cache.entries.lock().unwrap().is_empty());
    }
}
