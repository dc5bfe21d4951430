use tracing::info;

use crate::access::{Actor, EntityKind, Operation, Target, chain};
use crate::errors::{LmsError, Result};
use crate::services::LmsContext;

/// 只能删除没有单元和作业的课程，选课记录随课程一并删除
pub async fn delete_course(ctx: &LmsContext, actor: &Actor, id: i64) -> Result<()> {
    let (course, scope) = chain::load_course(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Delete, Target::course(&course), &scope)
        .await?;

    if !ctx.storage.delete_course(id).await? {
        return Err(LmsError::not_found(format!("Course {id} not found")));
    }
    ctx.invalidate(EntityKind::Course, id).await;
    ctx.invalidate_lists(EntityKind::Enrollment).await;

    info!("Course {} deleted by user {}", id, actor.user_id);
    Ok(())
}
