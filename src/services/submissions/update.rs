use chrono::Utc;
use tracing::info;

use crate::access::{Actor, EntityKind, Operation, Target, chain};
use crate::errors::{LmsError, Result};
use crate::lifecycle::submission::{check_update, require_answer};
use crate::media::{self, UploadedFile};
use crate::models::submissions::{entities::Submission, requests::SubmitRequest};
use crate::services::LmsContext;

/// 截止前修改自己的提交；提供 files 时替换全部附件并释放旧文件
pub async fn update_submission(
    ctx: &LmsContext,
    actor: &Actor,
    id: i64,
    req: SubmitRequest,
    files: Option<Vec<UploadedFile>>,
) -> Result<Submission> {
    let (submission, assignment, scope) =
        chain::load_submission(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Update, Target::submission(&submission), &scope)
        .await?;

    check_update(actor, submission.status, Utc::now(), assignment.due_date)?;
    require_answer(
        req.text_answer
            .as_deref()
            .or(submission.text_answer.as_deref()),
        files.as_ref().map_or(submission.files.len(), Vec::len),
    )?;

    let new_refs = match files {
        Some(files) => {
            media::check_uploads(&files, &ctx.upload)?;
            let folder = format!("submissions/{}", assignment.id);
            Some(media::put_all(ctx.media.as_ref(), &files, &folder).await?)
        }
        None => None,
    };

    let result = ctx
        .storage
        .update_submission_content(
            id,
            req.text_answer,
            new_refs.clone(),
            actor.is_admin(),
        )
        .await
        .and_then(|s| s.ok_or_else(|| LmsError::not_found(format!("Submission {id} not found"))));
    let updated = match result {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(ref refs) = new_refs {
                media::release_all(ctx.media.as_ref(), refs).await;
            }
            return Err(e);
        }
    };

    if new_refs.is_some() {
        media::release_all(ctx.media.as_ref(), &submission.files).await;
    }
    ctx.invalidate(EntityKind::Submission, id).await;

    info!("Submission {} updated by user {}", id, actor.user_id);
    Ok(updated)
}
