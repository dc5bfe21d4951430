use tracing::info;

use crate::access::{Actor, EntityKind, Operation, Target, chain};
use crate::errors::{LmsError, Result};
use crate::lifecycle::submission::check_delete;
use crate::media;
use crate::services::LmsContext;

/// 软删除提交并释放其文件，之后可以重新提交
pub async fn delete_submission(ctx: &LmsContext, actor: &Actor, id: i64) -> Result<()> {
    let (submission, _, scope) = chain::load_submission(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Delete, Target::submission(&submission), &scope)
        .await?;

    check_delete(submission.status)?;

    if !ctx.storage.soft_delete_submission(id).await? {
        return Err(LmsError::not_found(format!("Submission {id} not found")));
    }
    media::release_all(ctx.media.as_ref(), &submission.files).await;
    ctx.invalidate(EntityKind::Submission, id).await;

    info!(
        "Submission {} of assignment {} deleted by user {}",
        id, submission.assignment_id, actor.user_id
    );
    Ok(())
}
