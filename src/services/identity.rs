//! 令牌 → 请求方
//!
//! 令牌签名由 `JwtUtils` 校验；这里把声明中的用户解析为 [`Actor`]，拒绝不存在或已停用的用户。
//! 解析结果按令牌缓存，停用用户时清除整个 `actor:` 前缀。

use tracing::debug;

use crate::access::Actor;
use crate::cache::{CacheResult, keys::actor_key};
use crate::errors::{LmsError, Result};
use crate::services::LmsContext;
use crate::utils::jwt::Claims;

pub async fn resolve_actor(ctx: &LmsContext, token: &str, claims: &Claims) -> Result<Actor> {
    let key = actor_key(token);
    if ctx.cache_enabled
        && let CacheResult::Found(raw) = ctx.cache.get_raw(&key).await
    {
        match serde_json::from_str::<Actor>(&raw) {
            Ok(actor) => return Ok(actor),
            Err(e) => {
                debug!("Dropping undecodable actor cache entry: {}", e);
                ctx.cache.remove(&key).await;
            }
        }
    }

    let user_id = claims
        .user_id()
        .ok_or_else(|| LmsError::authentication_with_reason("invalid_token", "Invalid subject"))?;
    let user = ctx
        .storage
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| LmsError::authentication_with_reason("unknown_user", "User not found"))?;
    if !user.active {
        return Err(LmsError::authentication_with_reason(
            "user_inactive",
            "User is not active",
        ));
    }

    let actor = Actor::new(user.id, user.role);
    if ctx.cache_enabled
        && let Ok(raw) = serde_json::to_string(&actor)
    {
        ctx.cache.insert_raw(key, raw, ctx.cache_ttl).await;
    }
    Ok(actor)
}
