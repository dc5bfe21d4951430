use crate::access::{Actor, ChainLink, EntityKind, chain};
use crate::cache::keys::list_key;
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationQuery,
    submissions::{entities::Submission, requests::MySubmissionListParams},
};
use crate::services::{LmsContext, enrollments::authorize_roster};

/// 作业的全部有效提交，面向课程教师、教务管理与管理员
pub async fn list_assignment_submissions(
    ctx: &LmsContext,
    actor: &Actor,
    assignment_id: i64,
    pagination: PaginationQuery,
) -> Result<PaginatedResponse<Submission>> {
    let (assignment, scope) = chain::load_assignment(ctx.storage.as_ref(), assignment_id).await?;
    authorize_roster(ctx, actor, &scope.below(ChainLink::assignment(&assignment))).await?;

    let (page, size) = pagination.normalized();
    let key = list_key(
        EntityKind::Submission,
        &format!("assignment={assignment_id}"),
        actor.role,
        page,
        size,
    );

    ctx.cached(key, move || {
        ctx.storage
            .list_assignment_submissions(assignment_id, page, size)
    })
    .await
}

/// 我的提交，可按课程过滤
pub async fn list_my_submissions(
    ctx: &LmsContext,
    actor: &Actor,
    params: MySubmissionListParams,
) -> Result<PaginatedResponse<Submission>> {
    let (page, size) = params.pagination.normalized();
    let course = params
        .course_id
        .map_or_else(|| "any".to_string(), |id| id.to_string());
    let key = list_key(
        EntityKind::Submission,
        &format!("student={}:course={course}", actor.user_id),
        actor.role,
        page,
        size,
    );

    ctx.cached(key, move || {
        ctx.storage
            .list_student_submissions(actor.user_id, params)
    })
    .await
}
