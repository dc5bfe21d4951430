use tracing::info;

use super::require_roles;
use crate::access::Actor;
use crate::errors::Result;
use crate::models::users::{
    entities::{GlobalRole, User},
    requests::CreateUserRequest,
};
use crate::services::LmsContext;
use crate::utils::validate::{check, validate_email, validate_username};

pub async fn create_user(ctx: &LmsContext, actor: &Actor, req: CreateUserRequest) -> Result<User> {
    require_roles(actor, GlobalRole::admin_roles())?;

    check("invalid_username", validate_username(&req.username))?;
    check("invalid_email", validate_email(&req.email))?;

    // 用户名与邮箱的唯一性由唯一索引保证
    let user = ctx.storage.create_user(req).await?;

    info!(
        "User {} ({}) created with role {} by user {}",
        user.id, user.username, user.role, actor.user_id
    );
    Ok(user)
}
