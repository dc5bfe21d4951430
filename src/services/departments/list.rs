use crate::access::{Actor, EntityKind, Operation, Scope, Target};
use crate::cache::keys::list_key;
use crate::errors::Result;
use crate::models::{
    PaginatedResponse,
    departments::{entities::Department, requests::DepartmentListParams},
    users::entities::GlobalRole,
};
use crate::services::LmsContext;

pub async fn list_departments(
    ctx: &LmsContext,
    actor: &Actor,
    params: DepartmentListParams,
) -> Result<PaginatedResponse<Department>> {
    ctx.authorize(
        actor,
        Operation::Read,
        Target::new(EntityKind::Department),
        &Scope::root(),
    )
    .await?;

    // 学生只看到启用的院系
    let active_only = actor.role == GlobalRole::Student;
    let (page, size) = params.pagination.normalized();
    let key = list_key(
        EntityKind::Department,
        &format!("all:{}", params.search.as_deref().unwrap_or_default()),
        actor.role,
        page,
        size,
    );

    ctx.cached(key, move || {
        ctx.storage
            .list_departments_with_pagination(params, active_only)
    })
    .await
}
