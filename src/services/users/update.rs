use tracing::info;

use super::require_roles;
use crate::access::Actor;
use crate::cache::keys::ACTOR_PREFIX;
use crate::errors::{LmsError, Result};
use crate::models::users::entities::{GlobalRole, User};
use crate::services::LmsContext;

/// 停用后该用户的令牌立即失效
pub async fn set_user_active(
    ctx: &LmsContext,
    actor: &Actor,
    id: i64,
    active: bool,
) -> Result<User> {
    require_roles(actor, GlobalRole::admin_roles())?;

    if !active && id == actor.user_id {
        return Err(LmsError::validation_with_reason(
            "cannot_deactivate_self",
            "You cannot deactivate your own account",
        ));
    }

    let user = ctx
        .storage
        .set_user_active(id, active)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("User {id} not found")))?;
    ctx.cache.remove_prefix(ACTOR_PREFIX).await;

    info!("User {} set active={} by user {}", id, active, actor.user_id);
    Ok(user)
}
