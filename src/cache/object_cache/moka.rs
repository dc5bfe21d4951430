use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

/// 进程内缓存，TTL 在构建时统一设置
pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::with_capacity(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    pub fn with_capacity(max_capacity: u64, ttl: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl.max(1)))
            .build();
        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, ttl: {}s",
            max_capacity, ttl
        );
        Self { inner }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => CacheResult::Found(value),
            None => CacheResult::NotFound,
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        // 单条 TTL 不生效，使用构建时的全局 TTL
        if ttl != 0 {
            debug!("Moka cache ignores per-item TTL for key: {}", key);
        }
        self.inner.insert(key, value).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn remove_prefix(&self, prefix: &str) {
        let keys: Vec<String> = self
            .inner
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.as_ref().clone())
            .collect();
        for key in &keys {
            self.inner.invalidate(key).await;
        }
        debug!("Removed {} keys with prefix: {}", keys.len(), prefix);
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remove_prefix_only_touches_matching_keys() {
        let cache = MokaCacheWrapper::with_capacity(100, 60);
        cache.insert_raw("course:1:admin".into(), "a".into(), 0).await;
        cache.insert_raw("course:1:student".into(), "b".into(), 0).await;
        cache.insert_raw("course:12:student".into(), "c".into(), 0).await;

        cache.remove_prefix("course:1:").await;

        assert_eq!(cache.get_raw("course:1:admin").await, CacheResult::NotFound);
        assert_eq!(cache.get_raw("course:1:student").await, CacheResult::NotFound);
        assert_eq!(
            cache.get_raw("course:12:student").await,
            CacheResult::Found("c".to_string())
        );
    }
}
