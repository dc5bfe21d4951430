use crate::access::{Actor, EntityKind};
use crate::cache::keys::list_key;
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationQuery,
    courses::{
        entities::Course,
        requests::{CourseListParams, CourseQuery},
    },
    users::entities::GlobalRole,
};
use crate::services::LmsContext;

/// 课程列表按角色过滤：
/// - admin / manager：全部课程
/// - teacher：自己任教的课程
/// - student：自己选修且已发布的课程
///
/// 非管理员看不到停用院系下的课程。
pub async fn list_courses(
    ctx: &LmsContext,
    actor: &Actor,
    params: CourseListParams,
) -> Result<PaginatedResponse<Course>> {
    let (page, size) = params.pagination.normalized();
    let member_id = match actor.role {
        GlobalRole::Admin | GlobalRole::Manager => None,
        GlobalRole::Teacher | GlobalRole::Student => Some(actor.user_id),
    };

    let query = CourseQuery {
        page,
        size,
        department_id: params.department_id,
        search: params.search,
        member_id,
        published_only: actor.role == GlobalRole::Student,
        active_departments_only: !actor.is_admin(),
    };
    fetch_cached(ctx, actor, query).await
}

/// 我的课程：只返回本人有选课记录的课程
pub async fn list_my_courses(
    ctx: &LmsContext,
    actor: &Actor,
    pagination: PaginationQuery,
) -> Result<PaginatedResponse<Course>> {
    let (page, size) = pagination.normalized();
    let query = CourseQuery {
        page,
        size,
        member_id: Some(actor.user_id),
        published_only: actor.role == GlobalRole::Student,
        active_departments_only: !actor.is_admin(),
        ..Default::default()
    };
    fetch_cached(ctx, actor, query).await
}

async fn fetch_cached(
    ctx: &LmsContext,
    actor: &Actor,
    query: CourseQuery,
) -> Result<PaginatedResponse<Course>> {
    let scope = format!(
        "dept={}:member={}:search={}",
        query
            .department_id
            .map_or_else(|| "any".to_string(), |id| id.to_string()),
        query
            .member_id
            .map_or_else(|| "any".to_string(), |id| id.to_string()),
        query.search.as_deref().unwrap_or_default()
    );
    let key = list_key(EntityKind::Course, &scope, actor.role, query.page, query.size);

    ctx.cached(key, move || ctx.storage.list_courses_with_pagination(query))
        .await
}
