use chrono::Utc;
use tracing::info;

use crate::access::{Actor, ChainLink, EntityKind, Operation, Target};
use crate::errors::{LmsError, Result};
use crate::lifecycle::submission::{initial_status, require_answer, require_no_live};
use crate::media::{self, UploadedFile};
use crate::models::submissions::{entities::Submission, requests::SubmitRequest};
use crate::services::{LmsContext, assignments::load_live_assignment};

/// 学生提交作业：作业及其祖先均可见、已选修、尚无有效提交
pub async fn create_submission(
    ctx: &LmsContext,
    actor: &Actor,
    assignment_id: i64,
    req: SubmitRequest,
    files: Vec<UploadedFile>,
) -> Result<Submission> {
    let (assignment, scope) = load_live_assignment(ctx.storage.as_ref(), assignment_id).await?;
    let scope = scope.below(ChainLink::assignment(&assignment));
    let target = Target {
        owner_id: Some(actor.user_id),
        ..Target::new(EntityKind::Submission)
    };
    ctx.authorize(actor, Operation::Create, target, &scope)
        .await?;

    require_answer(req.text_answer.as_deref(), files.len())?;
    let existing = ctx
        .storage
        .find_live_submission(assignment_id, actor.user_id)
        .await?;
    require_no_live(existing.map(|s| s.id))?;
    media::check_uploads(&files, &ctx.upload)?;

    let status = initial_status(Utc::now(), assignment.due_date);
    let folder = format!("submissions/{assignment_id}");
    let refs = media::put_all(ctx.media.as_ref(), &files, &folder).await?;

    let result = ctx
        .storage
        .create_submission(
            assignment_id,
            actor.user_id,
            req.text_answer,
            refs.clone(),
            status,
        )
        .await;
    let submission = match result {
        Ok(submission) => submission,
        Err(e) => {
            media::release_all(ctx.media.as_ref(), &refs).await;
            // 并发提交被唯一索引拦下
            if e.reason() == "duplicate" {
                return Err(LmsError::conflict_with_reason(
                    "duplicate_submission",
                    "You have already submitted this assignment",
                ));
            }
            return Err(e);
        }
    };
    ctx.invalidate(EntityKind::Submission, submission.id).await;

    info!(
        "Submission {} ({}) created for assignment {} by student {}",
        submission.id, submission.status, assignment_id, actor.user_id
    );
    Ok(submission)
}
