//! 缓存层
//!
//! 缓存只保存与角色相关的读取结果，从不参与授权判定。
//! 每次成功的写操作在返回前同步删除 `{kind}:{id}:` 与 `{kind}:list:` 前缀。

pub mod keys;
pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use tracing::debug;

use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端不可用或数据损坏
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// ttl 为 0 时使用后端默认值
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    /// 删除所有以 prefix 开头的键
    async fn remove_prefix(&self, prefix: &str);
    async fn invalidate_all(&self);
}

/// 注册缓存插件，插件类型需提供 `fn new() -> Result<Self, String>`
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache =
                            <$ty>::new().map_err($crate::errors::LmsError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}

/// 读穿缓存：命中则反序列化返回，否则调用 loader 并写入
pub async fn read_through<T, F, Fut>(
    cache: &dyn ObjectCache,
    key: String,
    ttl: u64,
    loader: F,
) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if let CacheResult::Found(raw) = cache.get_raw(&key).await {
        match serde_json::from_str::<T>(&raw) {
            Ok(value) => return Ok(value),
            Err(e) => {
                debug!("Dropping undecodable cache entry {}: {}", key, e);
                cache.remove(&key).await;
            }
        }
    }

    let value = loader().await?;
    if let Ok(raw) = serde_json::to_string(&value) {
        cache.insert_raw(key, raw, ttl).await;
    }
    Ok(value)
}

/// 写操作成功后调用：清除该实体的按 id 缓存与同类列表缓存
pub async fn invalidate_entity(cache: &dyn ObjectCache, kind: crate::access::EntityKind, id: i64) {
    cache.remove_prefix(&keys::entity_prefix(kind, id)).await;
    cache.remove_prefix(&keys::list_prefix(kind)).await;
}

/// 新建实体时只有列表受影响
pub async fn invalidate_lists(cache: &dyn ObjectCache, kind: crate::access::EntityKind) {
    cache.remove_prefix(&keys::list_prefix(kind)).await;
}
