use crate::access::{Actor, Operation, Target, chain};
use crate::errors::{LmsError, Result};
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::services::LmsContext;

/// 本人、课程教师、教务管理与管理员可查看；已删除的提交只有管理员可见
pub async fn get_submission(ctx: &LmsContext, actor: &Actor, id: i64) -> Result<Submission> {
    let (submission, _, scope) = chain::load_submission(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Read, Target::submission(&submission), &scope)
        .await?;

    if submission.status == SubmissionStatus::Deleted && !actor.is_admin() {
        return Err(LmsError::not_found(format!("Submission {id} not found")));
    }
    Ok(submission)
}
