use tracing::info;

use super::invalidate_membership;
use crate::access::{Actor, ChainLink, EntityKind, Operation, Target, chain};
use crate::errors::{LmsError, Result};
use crate::services::LmsContext;

/// 移除选课；课程唯一的教师不能被移除
pub async fn remove_enrollment(
    ctx: &LmsContext,
    actor: &Actor,
    course_id: i64,
    user_id: i64,
) -> Result<()> {
    let (course, scope) = chain::load_course(ctx.storage.as_ref(), course_id).await?;
    let scope = scope.below(ChainLink::course(&course));

    ctx.authorize(
        actor,
        Operation::Enroll,
        Target::new(EntityKind::Enrollment),
        &scope,
    )
    .await?;

    let enrollment = ctx
        .storage
        .get_enrollment(user_id, course_id)
        .await?
        .ok_or_else(|| {
            LmsError::not_found(format!(
                "User {user_id} is not enrolled in course {course_id}"
            ))
        })?;

    // 检查与删除在同一事务中完成
    if !ctx.storage.remove_enrollment(user_id, course_id).await? {
        return Err(LmsError::not_found(format!(
            "User {user_id} is not enrolled in course {course_id}"
        )));
    }
    invalidate_membership(ctx, enrollment.id).await;

    info!(
        "User {} removed from course {} by user {}",
        user_id, course_id, actor.user_id
    );
    Ok(())
}
