use crate::access::{Actor, EntityKind, Operation, Target, chain};
use crate::cache::keys::list_key;
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationQuery, assignments::entities::Assignment,
    users::entities::GlobalRole,
};
use crate::services::LmsContext;

/// 课程作业按截止时间排序；学生只看到启用且已发布的作业，
/// 停用单元下的作业只有管理员可见
pub async fn list_assignments(
    ctx: &LmsContext,
    actor: &Actor,
    course_id: i64,
    pagination: PaginationQuery,
) -> Result<PaginatedResponse<Assignment>> {
    let (course, scope) = chain::load_course(ctx.storage.as_ref(), course_id).await?;
    ctx.authorize(actor, Operation::Read, Target::course(&course), &scope)
        .await?;

    let visible_only = actor.role == GlobalRole::Student;
    let active_modules_only = !actor.is_admin();
    let (page, size) = pagination.normalized();
    let key = list_key(
        EntityKind::Assignment,
        &format!("course={course_id}"),
        actor.role,
        page,
        size,
    );

    ctx.cached(key, move || {
        ctx.storage
            .list_assignments_with_pagination(
                course_id,
                visible_only,
                active_modules_only,
                page,
                size,
            )
    })
    .await
}
