//! 业务逻辑层
//!
//! 每个写操作的流程：加载目标与祖先链 → 授权 → 校验局部不变量 → 写库 → 清除缓存。
//! 读操作同样先授权，再读取（列表可能命中缓存）。

pub mod assignments;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod identity;
pub mod lessons;
pub mod modules;
pub mod reports;
pub mod submissions;
pub mod users;

use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use crate::access::{self, Actor, EntityKind, Operation, Scope, Target};
use crate::cache::{self, ObjectCache};
use crate::config::{AppConfig, UploadConfig};
use crate::errors::Result;
use crate::media::MediaStore;
use crate::storage::Storage;

/// 服务依赖，注册为 actix 的 app_data
#[derive(Clone)]
pub struct LmsContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub media: Arc<dyn MediaStore>,
    pub cache_ttl: u64,
    /// 关闭时读操作直接访问存储，不读写缓存
    pub cache_enabled: bool,
    pub upload: UploadConfig,
}

impl LmsContext {
    pub fn new(
        storage: Arc<dyn Storage>,
        cache: Arc<dyn ObjectCache>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        let config = AppConfig::get();
        Self::with_settings(
            storage,
            cache,
            media,
            config.cache.default_ttl,
            config.upload.clone(),
        )
        .with_cache_enabled(config.cache.enabled)
    }

    pub fn with_settings(
        storage: Arc<dyn Storage>,
        cache: Arc<dyn ObjectCache>,
        media: Arc<dyn MediaStore>,
        cache_ttl: u64,
        upload: UploadConfig,
    ) -> Self {
        Self {
            storage,
            cache,
            media,
            cache_ttl,
            cache_enabled: true,
            upload,
        }
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// 加载 actor 在作用域课程上的选课角色并执行授权判定
    pub async fn authorize(
        &self,
        actor: &Actor,
        op: Operation,
        target: Target,
        scope: &Scope,
    ) -> Result<()> {
        let enrollment = match scope.course_id {
            Some(course_id) if !actor.is_admin() => self
                .storage
                .get_enrollment(actor.user_id, course_id)
                .await?
                .map(|e| e.role),
            _ => None,
        };

        let decision = access::authorize(actor, enrollment, op, &target, &scope.chain);
        if !decision.is_allowed() {
            debug!(
                "Denied {:?} on {} {:?} for user {}: {:?}",
                op, target.kind, target.id, actor.user_id, decision
            );
        }
        decision.into_result()
    }

    pub(crate) async fn cached<T, F, Fut>(&self, key: String, loader: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !self.cache_enabled {
            return loader().await;
        }
        cache::read_through(self.cache.as_ref(), key, self.cache_ttl, loader).await
    }

    /// 写操作成功后清除该实体的缓存
    pub(crate) async fn invalidate(&self, kind: EntityKind, id: i64) {
        cache::invalidate_entity(self.cache.as_ref(), kind, id).await;
    }

    /// 只清除某类实体的列表缓存
    pub(crate) async fn invalidate_lists(&self, kind: EntityKind) {
        cache::invalidate_lists(self.cache.as_ref(), kind).await;
    }
}
