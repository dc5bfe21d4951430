use super::authorize_roster;
use crate::access::{Actor, ChainLink, EntityKind, chain};
use crate::aggregation;
use crate::cache::keys::{aggregate_key, list_key};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse,
    enrollments::{
        requests::EnrollmentListParams,
        responses::{MyEnrollment, Participant, ParticipantGroups},
    },
    users::entities::GlobalRole,
};
use crate::services::LmsContext;

pub async fn list_enrollments(
    ctx: &LmsContext,
    actor: &Actor,
    course_id: i64,
    params: EnrollmentListParams,
) -> Result<PaginatedResponse<Participant>> {
    let (course, scope) = chain::load_course(ctx.storage.as_ref(), course_id).await?;
    authorize_roster(ctx, actor, &scope.below(ChainLink::course(&course))).await?;

    let (page, size) = params.pagination.normalized();
    let role = params.role.map_or("any", |r| r.as_str());
    let key = list_key(
        EntityKind::Enrollment,
        &format!("course={course_id}:role={role}"),
        actor.role,
        page,
        size,
    );

    ctx.cached(key, move || {
        ctx.storage
            .list_enrollments_with_pagination(course_id, params)
    })
    .await
}

/// 参与者按教师与学生分组
pub async fn list_participants(
    ctx: &LmsContext,
    actor: &Actor,
    course_id: i64,
) -> Result<ParticipantGroups> {
    let (course, scope) = chain::load_course(ctx.storage.as_ref(), course_id).await?;
    authorize_roster(ctx, actor, &scope.below(ChainLink::course(&course))).await?;

    let key = aggregate_key(
        EntityKind::Enrollment,
        &format!("course={course_id}:participants"),
        actor.role,
    );
    ctx.cached(key, move || async move {
        let participants = ctx.storage.list_participants(course_id).await?;
        Ok(aggregation::group_participants(participants))
    })
    .await
}

/// 我的选课；学生看不到未发布的课程，非管理员看不到停用院系下的课程
pub async fn list_my_enrollments(ctx: &LmsContext, actor: &Actor) -> Result<Vec<MyEnrollment>> {
    let mut enrollments = ctx.storage.list_user_enrollments(actor.user_id).await?;
    if actor.role == GlobalRole::Student {
        enrollments.retain(|e| e.course.published);
    }
    if !actor.is_admin() {
        let inactive = ctx.storage.list_inactive_department_ids().await?;
        enrollments.retain(|e| !inactive.contains(&e.course.department_id));
    }
    Ok(enrollments)
}
