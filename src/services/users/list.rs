use super::require_roles;
use crate::access::Actor;
use crate::errors::Result;
use crate::models::{
    PaginatedResponse,
    users::{
        entities::{GlobalRole, User},
        requests::UserListParams,
    },
};
use crate::services::LmsContext;

pub async fn list_users(
    ctx: &LmsContext,
    actor: &Actor,
    params: UserListParams,
) -> Result<PaginatedResponse<User>> {
    require_roles(actor, GlobalRole::staff_roles())?;
    ctx.storage.list_users_with_pagination(params).await
}
