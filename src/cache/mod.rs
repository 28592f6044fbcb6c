//! Cache layer
//!
//! Process-local view cache for the catalog. Mutations in the service
//! layer invalidate dependent views by key prefix: workshop keys live
//! under `workshops:`, category lists under `categories:`, tag lists
//! under `tags:`. Since workshop views denormalize category and tag
//! names, category/tag mutations invalidate the `workshops:` prefix too.
//!
//! Values are stored as JSON strings so any serializable type fits a
//! single cache instance.

use anyhow::{Context, Result};
use moka::future::Cache as MokaCache;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;

/// Default maximum cache capacity (number of entries)
const DEFAULT_MAX_CAPACITY: u64 = 1_000;

/// Cache key prefixes for the dependent views
pub mod keys {
    /// Public and admin workshop views
    pub const WORKSHOPS: &str = "workshops:";
    /// Category lists
    pub const CATEGORIES: &str = "categories:";
    /// Tag lists
    pub const TAGS: &str = "tags:";
}

/// Serialized cache entry.
#[derive(Clone)]
struct CacheEntry {
    data: Arc<String>,
}

impl CacheEntry {
    fn new<T: Serialize>(value: &T) -> Result<Self> {
        let json = serde_json::to_string(value).context("Failed to serialize cache value")?;
        Ok(Self { data: Arc::new(json) })
    }

    fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.data).context("Failed to deserialize cache value")
    }
}

/// In-memory view cache backed by moka.
pub struct Cache {
    inner: MokaCache<String, CacheEntry>,
    ttl: Duration,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("entry_count", &self.inner.entry_count())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl Cache {
    /// Create a cache with the given entry TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        let inner = MokaCache::builder()
            .max_capacity(DEFAULT_MAX_CAPACITY)
            .time_to_live(ttl)
            .build();
        Self { inner, ttl }
    }

    /// The TTL applied to every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a cached value, `None` on miss or expiry.
    ///
    /// A value that fails to deserialize is treated as a miss; the entry
    /// is dropped so the caller repopulates it.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry = self.inner.get(key).await?;
        match entry.deserialize() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Dropping undecodable cache entry {key}: {e}");
                self.inner.invalidate(key).await;
                None
            }
        }
    }

    /// Cache a value under the given key.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let entry = CacheEntry::new(value)?;
        self.inner.insert(key.to_string(), entry).await;
        Ok(())
    }

    /// Remove one entry.
    pub async fn delete(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    /// Remove every entry whose key starts with `prefix`.
    pub async fn delete_prefix(&self, prefix: &str) {
        let keys: Vec<String> = self
            .inner
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| (*key).clone())
            .collect();
        for key in keys {
            self.inner.invalidate(&key).await;
        }
    }

    /// Remove everything.
    pub async fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }
}

/// Create the shared cache instance from configuration.
pub fn create_cache(config: &CacheConfig) -> Arc<Cache> {
    Arc::new(Cache::with_ttl(Duration::from_secs(config.ttl_seconds)))
}
