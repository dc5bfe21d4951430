use chrono::Utc;
use tracing::info;

use crate::access::{Actor, EntityKind, Operation, Target, chain};
use crate::errors::{LmsError, Result};
use crate::lifecycle::publish;
use crate::models::courses::entities::Course;
use crate::services::LmsContext;

/// 切换课程发布状态，发布时记录 published_at，取消发布时清空
pub async fn toggle_course_publish(ctx: &LmsContext, actor: &Actor, id: i64) -> Result<Course> {
    let (course, scope) = chain::load_course(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::PublishToggle, Target::course(&course), &scope)
        .await?;

    let state = publish::toggle(course.published, Utc::now());
    let updated = ctx
        .storage
        .set_course_published(id, state)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("Course {id} not found")))?;
    ctx.invalidate(EntityKind::Course, id).await;

    info!(
        "Course {} published={} by user {}",
        id, updated.published, actor.user_id
    );
    Ok(updated)
}
