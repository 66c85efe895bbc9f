use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

/// Default lifetime of a cached result
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Cached value with its insertion time
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    data: V,
    stored_at: Instant,
}

impl<V> CacheEntry<V> {
    /// TTL runs from insertion and is not extended by reads
    fn is_stale(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() > ttl
    }
}

/// In-memory result cache with a fixed TTL.
///
/// Stale entries are removed by the first read that finds them stale;
/// there is no background sweep. Writes to the same key are last-write-wins.
pub struct ResultCache<V> {
    entries: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    ttl: Duration,
}

impl<V: Clone + Send + Sync> ResultCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Get a cached value if present and fresh
    pub async fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => {
                    debug!("Cache miss: {}", key);
                    return None;
                }
                Some(entry) if !entry.is_stale(self.ttl) => {
                    debug!("✓ Cache hit: {}", key);
                    return Some(entry.data.clone());
                }
                Some(_) => {}
            }
        }

        // A writer may have refreshed the key since the read lock was released
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.is_stale(self.ttl)) {
            entries.remove(key);
            debug!("⚠ Cache entry expired and evicted: {}", key);
        }

        None
    }

    /// Store a value, replacing any previous entry and resetting its age
    pub async fn set(&self, key: &str, value: V) {
        let entry = CacheEntry {
            data: value,
            stored_at: Instant::now(),
        };

        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), entry);
        debug!("💾 Cached {}", key);
    }

    /// Remove one entry, or every entry when `key` is `None`
    pub async fn clear(&self, key: Option<&str>) {
        let mut entries = self.entries.write().await;
        match key {
            Some(key) => {
                entries.remove(key);
            }
            None => {
                entries.clear();
                info!("🔄 Result cache cleared");
            }
        }
    }

    /// True when the key is missing or stale. Does not evict.
    pub async fn is_expired(&self, key: &str) -> bool {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .map_or(true, |entry| entry.is_stale(self.ttl))
    }

    /// Number of stored entries, stale ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
