use tracing::info;

use crate::access::{Actor, EntityKind, Operation, Target, chain};
use crate::errors::{LmsError, Result};
use crate::lifecycle::submission::check_grade;
use crate::models::submissions::{entities::Submission, requests::GradeSubmissionRequest};
use crate::services::LmsContext;

/// 课程教师或管理员评分；graded 之后只有管理员可以重新评分
pub async fn grade_submission(
    ctx: &LmsContext,
    actor: &Actor,
    id: i64,
    req: GradeSubmissionRequest,
) -> Result<Submission> {
    let (submission, assignment, scope) =
        chain::load_submission(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Grade, Target::submission(&submission), &scope)
        .await?;

    check_grade(actor, submission.status, req.grade, assignment.max_marks)?;

    let graded = ctx
        .storage
        .grade_submission(id, req.grade, req.feedback, actor.user_id, actor.is_admin())
        .await?
        .ok_or_else(|| LmsError::not_found(format!("Submission {id} not found")))?;
    ctx.invalidate(EntityKind::Submission, id).await;

    info!(
        "Submission {} graded {} / {} by user {}",
        id, req.grade, assignment.max_marks, actor.user_id
    );
    Ok(graded)
}
