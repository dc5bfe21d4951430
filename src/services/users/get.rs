use super::require_roles;
use crate::access::Actor;
use crate::errors::{LmsError, Result};
use crate::models::users::entities::{GlobalRole, User};
use crate::services::LmsContext;

/// 管理员与教务管理可查看任意用户，其他人只能查看自己
pub async fn get_user(ctx: &LmsContext, actor: &Actor, id: i64) -> Result<User> {
    if actor.user_id != id {
        require_roles(actor, GlobalRole::staff_roles())?;
    }
    ctx.storage
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("User {id} not found")))
}

pub async fn get_current_user(ctx: &LmsContext, actor: &Actor) -> Result<User> {
    get_user(ctx, actor, actor.user_id).await
}
