use tracing::info;

use crate::access::{Actor, EntityKind, Operation, Target, chain};
use crate::errors::{LmsError, Result};
use crate::models::courses::{entities::Course, requests::UpdateCourseRequest};
use crate::services::LmsContext;
use crate::utils::validate::require_text;

pub async fn update_course(
    ctx: &LmsContext,
    actor: &Actor,
    id: i64,
    update: UpdateCourseRequest,
) -> Result<Course> {
    let (course, scope) = chain::load_course(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Update, Target::course(&course), &scope)
        .await?;

    if let Some(ref title) = update.title {
        require_text("title", title)?;
    }
    // 迁移到其他院系时目标院系必须存在
    if let Some(department_id) = update.department_id
        && department_id != course.department_id
    {
        chain::load_department(ctx.storage.as_ref(), department_id).await?;
    }

    let updated = ctx
        .storage
        .update_course(id, update)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("Course {id} not found")))?;
    ctx.invalidate(EntityKind::Course, id).await;

    info!("Course {} updated by user {}", id, actor.user_id);
    Ok(updated)
}
