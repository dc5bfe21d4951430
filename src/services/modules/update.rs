use tracing::info;

use crate::access::{Actor, EntityKind, Operation, Target, chain};
use crate::errors::{LmsError, Result};
use crate::models::course_modules::{entities::CourseModule, requests::UpdateModuleRequest};
use crate::services::LmsContext;
use crate::utils::validate::require_text;

pub async fn update_module(
    ctx: &LmsContext,
    actor: &Actor,
    id: i64,
    update: UpdateModuleRequest,
) -> Result<CourseModule> {
    let (module, scope) = chain::load_module(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Update, Target::module(&module), &scope)
        .await?;

    if let Some(ref title) = update.title {
        require_text("title", title)?;
    }

    let updated = ctx
        .storage
        .update_module(id, update)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("Module {id} not found")))?;
    ctx.invalidate(EntityKind::Module, id).await;

    info!("Module {} updated by user {}", id, actor.user_id);
    Ok(updated)
}

pub async fn set_module_active(
    ctx: &LmsContext,
    actor: &Actor,
    id: i64,
    active: bool,
) -> Result<CourseModule> {
    let (module, scope) = chain::load_module(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Update, Target::module(&module), &scope)
        .await?;

    let updated = ctx
        .storage
        .set_module_active(id, active)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("Module {id} not found")))?;
    ctx.invalidate(EntityKind::Module, id).await;
    ctx.invalidate_lists(EntityKind::Assignment).await;

    info!("Module {} set active={} by user {}", id, active, actor.user_id);
    Ok(updated)
}
