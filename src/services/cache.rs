use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::RwLock;

use crate::errors::Result;

struct CacheEntry {
    stored_at: Instant,
    value: Value,
}

/// Short-TTL memoization of proxied upstream responses. Stale entries are
/// overwritten lazily on the next miss; nothing survives a restart.
#[derive(Default)]
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key` if it is younger than `ttl`,
    /// otherwise run `compute`, store the result and return it. Concurrent
    /// misses may compute twice; last writer wins.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, ttl: Duration, compute: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(key) {
                if entry.stored_at.elapsed() < ttl {
                    tracing::debug!(key, "cache hit");
                    return Ok(entry.value.clone());
                }
            }
        }

        let value = compute().await?;

        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                stored_at: Instant::now(),
                value: value.clone(),
            },
        );

        Ok(value)
    }
}
