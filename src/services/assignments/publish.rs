use chrono::Utc;
use tracing::info;

use super::load_live_assignment;
use crate::access::{Actor, EntityKind, Operation, Target};
use crate::errors::{LmsError, Result};
use crate::lifecycle::publish;
use crate::models::assignments::entities::Assignment;
use crate::services::LmsContext;

/// 已过截止时间的作业只能取消发布
pub async fn toggle_assignment_publish(
    ctx: &LmsContext,
    actor: &Actor,
    id: i64,
) -> Result<Assignment> {
    let (assignment, scope) = load_live_assignment(ctx.storage.as_ref(), id).await?;
    ctx.authorize(
        actor,
        Operation::PublishToggle,
        Target::assignment(&assignment),
        &scope,
    )
    .await?;

    let state = publish::toggle_assignment(assignment.published, assignment.due_date, Utc::now())?;
    let updated = ctx
        .storage
        .set_assignment_published(id, state)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("Assignment {id} not found")))?;
    ctx.invalidate(EntityKind::Assignment, id).await;

    info!(
        "Assignment {} published={} by user {}",
        id, updated.published, actor.user_id
    );
    Ok(updated)
}
