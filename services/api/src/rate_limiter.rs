//! Fixed-window rate limiter keyed by client address

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Stale entries are swept once the table grows past this size
const SWEEP_THRESHOLD: usize = 10_000;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of requests per window
    pub max_requests: u32,
    /// Time window in seconds
    pub window_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_seconds: 900, // 15 minutes
        }
    }
}

#[derive(Debug)]
struct RateLimiterEntry {
    requests: u32,
    window_start: Instant,
}

/// Rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, RateLimiterEntry>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn window(&self) -> Duration {
        Duration::from_secs(self.config.window_seconds)
    }

    /// Count a request for `key`; false once the window's budget is spent
    pub async fn is_allowed(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let window = self.window();

        if entries.len() > SWEEP_THRESHOLD {
            entries.retain(|_, entry| now.duration_since(entry.window_start) < window);
            debug!("Rate limiter swept, {} keys remain", entries.len());
        }

        let entry = entries
            .entry(key.to_string())
            .or_insert(RateLimiterEntry {
                requests: 0,
                window_start: now,
            });

        if now.duration_since(entry.window_start) >= window {
            entry.requests = 0;
            entry.window_start = now;
        }

        if entry.requests >= self.config.max_requests {
            info!("Rate limit exceeded for {}", key);
            return false;
        }

        entry.requests += 1;
        true
    }

    /// Get the rate limiter configuration
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }
}
