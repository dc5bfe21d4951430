use tracing::info;

use super::{check_video_link, require_content};
use crate::access::{Actor, EntityKind, Operation, Target, chain};
use crate::errors::{LmsError, Result};
use crate::media::{self, UploadedFile};
use crate::models::{
    lessons::{entities::Lesson, requests::UpdateLessonRequest},
    media::MediaRef,
};
use crate::services::LmsContext;
use crate::utils::validate::require_text;

/// 更新课时；提供 files 时整体替换附件，成功后释放旧文件
pub async fn update_lesson(
    ctx: &LmsContext,
    actor: &Actor,
    id: i64,
    update: UpdateLessonRequest,
    files: Option<Vec<UploadedFile>>,
) -> Result<Lesson> {
    let (lesson, scope) = chain::load_lesson(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Update, Target::lesson(&lesson), &scope)
        .await?;

    if let Some(ref title) = update.title {
        require_text("title", title)?;
    }
    check_video_link(update.video_link.as_deref())?;
    require_content(
        update
            .text_content
            .as_deref()
            .or(lesson.text_content.as_deref()),
        update.video_link.as_deref().or(lesson.video_link.as_deref()),
        files.as_ref().map_or(lesson.files.len(), Vec::len),
    )?;

    let new_refs = match files {
        Some(files) => {
            media::check_uploads(&files, &ctx.upload)?;
            let folder = format!("lessons/{}", lesson.module_id);
            Some(media::put_all(ctx.media.as_ref(), &files, &folder).await?)
        }
        None => None,
    };

    let updated = match ctx.storage.update_lesson(id, update, new_refs.clone()).await {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            release_new(ctx, new_refs.as_deref()).await;
            return Err(LmsError::not_found(format!("Lesson {id} not found")));
        }
        Err(e) => {
            release_new(ctx, new_refs.as_deref()).await;
            return Err(e);
        }
    };

    if new_refs.is_some() {
        media::release_all(ctx.media.as_ref(), &lesson.files).await;
    }
    ctx.invalidate(EntityKind::Lesson, id).await;

    info!("Lesson {} updated by user {}", id, actor.user_id);
    Ok(updated)
}

async fn release_new(ctx: &LmsContext, refs: Option<&[MediaRef]>) {
    if let Some(refs) = refs {
        media::release_all(ctx.media.as_ref(), refs).await;
    }
}

pub async fn set_lesson_active(
    ctx: &LmsContext,
    actor: &Actor,
    id: i64,
    active: bool,
) -> Result<Lesson> {
    let (lesson, scope) = chain::load_lesson(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Update, Target::lesson(&lesson), &scope)
        .await?;

    let updated = ctx
        .storage
        .set_lesson_active(id, active)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("Lesson {id} not found")))?;
    ctx.invalidate(EntityKind::Lesson, id).await;

    info!("Lesson {} set active={} by user {}", id, active, actor.user_id);
    Ok(updated)
}
