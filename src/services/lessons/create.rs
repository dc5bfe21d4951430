use tracing::info;

use super::{check_video_link, require_content};
use crate::access::{Actor, ChainLink, EntityKind, Operation, Target, chain};
use crate::errors::Result;
use crate::media::{self, UploadedFile};
use crate::models::lessons::{entities::Lesson, requests::CreateLessonRequest};
use crate::services::LmsContext;
use crate::utils::validate::require_text;

/// 先上传文件再写库；写库失败时释放本次上传的文件
pub async fn create_lesson(
    ctx: &LmsContext,
    actor: &Actor,
    module_id: i64,
    req: CreateLessonRequest,
    files: Vec<UploadedFile>,
) -> Result<Lesson> {
    let (module, scope) = chain::load_module(ctx.storage.as_ref(), module_id).await?;
    let scope = scope.below(ChainLink::module(&module));
    ctx.authorize(actor, Operation::Create, Target::new(EntityKind::Lesson), &scope)
        .await?;

    require_text("title", &req.title)?;
    check_video_link(req.video_link.as_deref())?;
    require_content(
        req.text_content.as_deref(),
        req.video_link.as_deref(),
        files.len(),
    )?;
    media::check_uploads(&files, &ctx.upload)?;

    let folder = format!("lessons/{}", module.id);
    let refs = media::put_all(ctx.media.as_ref(), &files, &folder).await?;

    let lesson = match ctx
        .storage
        .create_lesson(&module, req, refs.clone(), actor.user_id)
        .await
    {
        Ok(lesson) => lesson,
        Err(e) => {
            media::release_all(ctx.media.as_ref(), &refs).await;
            return Err(e);
        }
    };
    ctx.invalidate(EntityKind::Lesson, lesson.id).await;

    info!(
        "Lesson {} (order {}) created in module {} by user {}",
        lesson.id, lesson.order, module.id, actor.user_id
    );
    Ok(lesson)
}
