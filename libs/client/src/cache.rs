//! Short-lived cache of GET responses
//!
//! Entries are keyed by request signature and expire after the TTL; nothing
//! else invalidates them apart from [`ResponseCache::clear`].

use moka::future::Cache;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
pub struct ResponseCache {
    entries: Cache<String, Value>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder().time_to_live(ttl).build(),
        }
    }

    /// Cache key for a request: method, path and query string
    pub fn key(method: &str, path: &str, query: Option<&str>) -> String {
        match query.filter(|q| !q.is_empty()) {
            Some(query) => format!("{method} {path}?{query}"),
            None => format!("{method} {path}"),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        let body = self.entries.get(key).await;
        if body.is_some() {
            debug!("Cache hit for {}", key);
        }
        body
    }

    pub async fn put(&self, key: String, body: Value) {
        self.entries.insert(key, body).await;
    }

    pub async fn clear(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
    }

    /// Live entries, after expired ones have been evicted
    pub async fn len(&self) -> usize {
        self.entries.run_pending_tasks().await;
        usize::try_from(self.entries.entry_count()).unwrap_or(usize::MAX)
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
