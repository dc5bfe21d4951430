use crate::access::{Actor, EntityKind, Operation, Target, chain};
use crate::cache::keys::list_key;
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationQuery, lessons::entities::Lesson, users::entities::GlobalRole,
};
use crate::services::LmsContext;

/// 单元下的课时，按 order 升序
pub async fn list_lessons(
    ctx: &LmsContext,
    actor: &Actor,
    module_id: i64,
    pagination: PaginationQuery,
) -> Result<PaginatedResponse<Lesson>> {
    let (module, scope) = chain::load_module(ctx.storage.as_ref(), module_id).await?;
    ctx.authorize(actor, Operation::Read, Target::module(&module), &scope)
        .await?;

    let active_only = actor.role == GlobalRole::Student;
    let (page, size) = pagination.normalized();
    let key = list_key(
        EntityKind::Lesson,
        &format!("module={module_id}"),
        actor.role,
        page,
        size,
    );

    ctx.cached(key, move || {
        ctx.storage
            .list_lessons_with_pagination(module_id, active_only, page, size)
    })
    .await
}
