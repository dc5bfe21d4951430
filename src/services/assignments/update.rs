use chrono::Utc;
use tracing::info;

use super::load_live_assignment;
use crate::access::{Actor, EntityKind, Operation, Target};
use crate::errors::{LmsError, Result};
use crate::lifecycle::publish::{validate_due_date, validate_max_marks};
use crate::media::{self, UploadedFile};
use crate::models::assignments::{entities::Assignment, requests::UpdateAssignmentRequest};
use crate::services::LmsContext;
use crate::utils::validate::require_text;

/// 只校验请求中提供的字段；提供 files 时整体替换附件
pub async fn update_assignment(
    ctx: &LmsContext,
    actor: &Actor,
    id: i64,
    update: UpdateAssignmentRequest,
    files: Option<Vec<UploadedFile>>,
) -> Result<Assignment> {
    let (assignment, scope) = load_live_assignment(ctx.storage.as_ref(), id).await?;
    ctx.authorize(
        actor,
        Operation::Update,
        Target::assignment(&assignment),
        &scope,
    )
    .await?;

    if let Some(ref title) = update.title {
        require_text("title", title)?;
    }
    if let Some(due_date) = update.due_date {
        validate_due_date(due_date, Utc::now())?;
    }
    if let Some(max_marks) = update.max_marks {
        validate_max_marks(max_marks)?;
    }

    let new_refs = match files {
        Some(files) => {
            media::check_uploads(&files, &ctx.upload)?;
            let folder = format!("assignments/{}", assignment.course_id);
            Some(media::put_all(ctx.media.as_ref(), &files, &folder).await?)
        }
        None => None,
    };

    let result = ctx
        .storage
        .update_assignment(id, update, new_refs.clone())
        .await
        .and_then(|a| a.ok_or_else(|| LmsError::not_found(format!("Assignment {id} not found"))));
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
        media::release_all(ctx.media.as_ref(), &assignment.attachments).await;
    }
    ctx.invalidate(EntityKind::Assignment, id).await;

    info!("Assignment {} updated by user {}", id, actor.user_id);
    Ok(updated)
}
