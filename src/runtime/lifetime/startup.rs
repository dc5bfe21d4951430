use crate::cache::{ObjectCache, register::build_object_cache};
use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use crate::media::create_media_store;
use crate::models::users::{entities::GlobalRole, requests::CreateUserRequest};
use crate::services::LmsContext;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub ctx: LmsContext,
}

const FALLBACK_CACHE: &str = "moka";

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    match build_object_cache(cache_type).await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            return Ok(Arc::from(cache));
        }
        Err(e) => warn!("Failed to create {} cache: {}", cache_type, e),
    }

    if cache_type == FALLBACK_CACHE {
        return Err(LmsError::cache_plugin_not_found(format!(
            "No cache backend available (tried: {cache_type})"
        )));
    }

    warn!("Falling back to memory cache");
    let cache = build_object_cache(FALLBACK_CACHE).await?;
    warn!("Successfully created fallback Moka (in-memory) cache backend");
    Ok(Arc::from(cache))
}

/// 库中没有任何用户时创建引导管理员
///
/// 凭证由外部身份服务管理，这里只建本地账号，令牌的 `sub` 需与返回的 ID 对应。
pub async fn seed_admin(storage: &Arc<dyn Storage>, username: &str) -> Result<Option<i64>> {
    if username.is_empty() {
        debug!("Bootstrap admin disabled, skipping admin seed");
        return Ok(None);
    }

    let count = storage.count_users().await?;
    if count > 0 {
        debug!(
            "Database already has {} user(s), skipping admin seed",
            count
        );
        return Ok(None);
    }

    info!("No users found in database, creating bootstrap admin account...");
    let user = storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@localhost"),
            display_name: Some("Administrator".to_string()),
            role: GlobalRole::Admin,
        })
        .await?;

    warn!("==========================================================");
    warn!(
        "  Bootstrap admin created (ID: {}, username: {})",
        user.id, user.username
    );
    warn!("  Issue an identity token with sub = {} to sign in", user.id);
    warn!("==========================================================");
    Ok(Some(user.id))
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和媒体存储
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // redis 的 TLS 连接需要进程级加密提供者；重复安装时忽略
    let _ = rustls::crypto::ring::default_provider().install_default();

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    if let Err(e) = seed_admin(&storage, &config.app.bootstrap_admin).await {
        warn!("Failed to seed bootstrap admin: {}", e);
    }

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    let media = create_media_store()?;
    warn!("Media store '{}' initialized", config.upload.backend);

    Ok(StartupContext {
        ctx: LmsContext::new(storage, cache, media),
    })
}
