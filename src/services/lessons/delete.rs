use tracing::info;

use crate::access::{Actor, EntityKind, Operation, Target, chain};
use crate::errors::{LmsError, Result};
use crate::services::LmsContext;

/// 删除课时与其文件，同单元后续课时的序号前移
pub async fn delete_lesson(ctx: &LmsContext, actor: &Actor, id: i64) -> Result<()> {
    let (lesson, scope) = chain::load_lesson(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Delete, Target::lesson(&lesson), &scope)
        .await?;

    if !ctx.storage.delete_lesson(id, ctx.media.as_ref()).await? {
        return Err(LmsError::not_found(format!("Lesson {id} not found")));
    }
    // 列表前缀一并清除，同单元其他课时的序号已变化
    ctx.invalidate(EntityKind::Lesson, id).await;

    info!(
        "Lesson {} deleted from module {} by user {}",
        id, lesson.module_id, actor.user_id
    );
    Ok(())
}
