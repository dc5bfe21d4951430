use tracing::info;

use super::load_live_assignment;
use crate::access::{Actor, EntityKind, Operation, Target};
use crate::errors::{LmsError, Result};
use crate::services::LmsContext;

/// 软删除，附件与已有提交保留
pub async fn delete_assignment(ctx: &LmsContext, actor: &Actor, id: i64) -> Result<()> {
    let (assignment, scope) = load_live_assignment(ctx.storage.as_ref(), id).await?;
    ctx.authorize(
        actor,
        Operation::Delete,
        Target::assignment(&assignment),
        &scope,
    )
    .await?;

    if !ctx.storage.soft_delete_assignment(id).await? {
        return Err(LmsError::not_found(format!("Assignment {id} not found")));
    }
    ctx.invalidate(EntityKind::Assignment, id).await;

    info!(
        "Assignment {} of course {} deleted by user {}",
        id, assignment.course_id, actor.user_id
    );
    Ok(())
}
