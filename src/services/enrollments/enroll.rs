use tracing::info;

use super::invalidate_membership;
use crate::access::{Actor, ChainLink, EntityKind, Operation, Target, chain};
use crate::errors::{LmsError, Result};
use crate::lifecycle::enrollment::check_role_matches;
use crate::models::enrollments::{entities::Enrollment, requests::EnrollRequest};
use crate::services::LmsContext;

pub async fn enroll_user(
    ctx: &LmsContext,
    actor: &Actor,
    course_id: i64,
    req: EnrollRequest,
) -> Result<Enrollment> {
    let (course, scope) = chain::load_course(ctx.storage.as_ref(), course_id).await?;
    let scope = scope.below(ChainLink::course(&course));
    ctx.authorize(
        actor,
        Operation::Enroll,
        Target::new(EntityKind::Enrollment),
        &scope,
    )
    .await?;

    let user = ctx
        .storage
        .get_user_by_id(req.user_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("User {} not found", req.user_id)))?;
    if !user.active {
        return Err(LmsError::validation_with_reason(
            "user_inactive",
            format!("User {} is inactive", user.id),
        ));
    }
    check_role_matches(user.role, req.role)?;

    if ctx
        .storage
        .get_enrollment(user.id, course_id)
        .await?
        .is_some()
    {
        return Err(LmsError::conflict_with_reason(
            "already_enrolled",
            format!("User {} is already enrolled in course {course_id}", user.id),
        ));
    }

    // 并发的重复选课由 (user_id, course_id) 唯一索引拦截
    let enrollment = ctx
        .storage
        .enroll(user.id, course_id, req.role, actor.user_id)
        .await?;
    invalidate_membership(ctx, enrollment.id).await;

    info!(
        "User {} enrolled in course {} as {} by user {}",
        user.id, course_id, req.role, actor.user_id
    );
    Ok(enrollment)
}
