//! 统计报表：课程教师、教务管理与管理员可见，结果按角色缓存

use crate::access::{Actor, ChainLink, EntityKind, chain};
use crate::aggregation;
use crate::cache::keys::aggregate_key;
use crate::errors::Result;
use crate::models::{
    enrollments::responses::EnrollmentSummary,
    submissions::responses::{AssignmentSummary, SubmissionStatusRow},
};
use crate::services::{
    LmsContext, assignments::load_live_assignment, enrollments::authorize_roster,
};

pub async fn assignment_summary(
    ctx: &LmsContext,
    actor: &Actor,
    assignment_id: i64,
) -> Result<AssignmentSummary> {
    let (assignment, scope) = load_live_assignment(ctx.storage.as_ref(), assignment_id).await?;
    authorize_roster(ctx, actor, &scope.below(ChainLink::assignment(&assignment))).await?;

    let key = aggregate_key(
        EntityKind::Submission,
        &format!("assignment={assignment_id}:summary"),
        actor.role,
    );
    ctx.cached(key, move || async move {
        let submissions = ctx.storage.list_live_submissions(assignment_id).await?;
        Ok(aggregation::assignment_summary(&submissions))
    })
    .await
}

/// 以选课学生为准逐行列出，未提交的学生同样出现
pub async fn submission_status(
    ctx: &LmsContext,
    actor: &Actor,
    assignment_id: i64,
) -> Result<Vec<SubmissionStatusRow>> {
    let (assignment, scope) = load_live_assignment(ctx.storage.as_ref(), assignment_id).await?;
    authorize_roster(ctx, actor, &scope.below(ChainLink::assignment(&assignment))).await?;

    let course_id = assignment.course_id;
    let key = aggregate_key(
        EntityKind::Submission,
        &format!("assignment={assignment_id}:status"),
        actor.role,
    );
    ctx.cached(key, move || async move {
        let participants = ctx.storage.list_participants(course_id).await?;
        let submissions = ctx.storage.list_live_submissions(assignment_id).await?;
        Ok(aggregation::submission_status(&participants, &submissions))
    })
    .await
}

pub async fn enrollment_summary(
    ctx: &LmsContext,
    actor: &Actor,
    course_id: i64,
) -> Result<EnrollmentSummary> {
    let (course, scope) = chain::load_course(ctx.storage.as_ref(), course_id).await?;
    authorize_roster(ctx, actor, &scope.below(ChainLink::course(&course))).await?;

    let key = aggregate_key(
        EntityKind::Enrollment,
        &format!("course={course_id}:summary"),
        actor.role,
    );
    ctx.cached(key, move || async move {
        let participants = ctx.storage.list_participants(course_id).await?;
        Ok(aggregation::enrollment_summary(course_id, &participants))
    })
    .await
}
