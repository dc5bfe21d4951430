use crate::access::{Actor, EntityKind, Operation, Target, child_visible, chain};
use crate::cache::keys::list_key;
use crate::errors::Result;
use crate::models::{PaginatedResponse, PaginationQuery, course_modules::entities::CourseModule};
use crate::services::LmsContext;

/// 课程下的单元列表，能读取课程即可列出；学生只看到启用的单元
pub async fn list_modules(
    ctx: &LmsContext,
    actor: &Actor,
    course_id: i64,
    pagination: PaginationQuery,
) -> Result<PaginatedResponse<CourseModule>> {
    let (course, scope) = chain::load_course(ctx.storage.as_ref(), course_id).await?;
    ctx.authorize(actor, Operation::Read, Target::course(&course), &scope)
        .await?;

    // 停用的单元对该角色不可见时只查启用的
    let active_only = !child_visible(actor.role, Some(false), None);
    let (page, size) = pagination.normalized();
    let key = list_key(
        EntityKind::Module,
        &format!("course={course_id}"),
        actor.role,
        page,
        size,
    );

    ctx.cached(key, move || {
        ctx.storage
            .list_modules_with_pagination(course_id, active_only, page, size)
    })
    .await
}
