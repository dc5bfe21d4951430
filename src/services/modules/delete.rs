use tracing::info;

use crate::access::{Actor, EntityKind, Operation, Target, chain};
use crate::errors::{LmsError, Result};
use crate::services::LmsContext;

/// 级联删除单元及其课时；任一步失败时整体回滚，单元保持原样
pub async fn delete_module(ctx: &LmsContext, actor: &Actor, id: i64) -> Result<()> {
    let (module, scope) = chain::load_module(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Delete, Target::module(&module), &scope)
        .await?;

    if !ctx
        .storage
        .delete_module_cascade(id, ctx.media.as_ref())
        .await?
    {
        return Err(LmsError::not_found(format!("Module {id} not found")));
    }

    ctx.invalidate(EntityKind::Module, id).await;
    // 课时随单元删除，挂在单元下的作业改为直属课程
    ctx.invalidate_lists(EntityKind::Lesson).await;
    ctx.invalidate_lists(EntityKind::Assignment).await;

    info!(
        "Module {} of course {} deleted by user {}",
        id, module.course_id, actor.user_id
    );
    Ok(())
}
