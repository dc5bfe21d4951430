use tracing::info;

use crate::access::{Actor, EntityKind, Operation, Target, chain};
use crate::errors::{LmsError, Result};
use crate::models::departments::{entities::Department, requests::UpdateDepartmentRequest};
use crate::services::LmsContext;
use crate::utils::validate::{check, require_text, validate_code};

pub async fn update_department(
    ctx: &LmsContext,
    actor: &Actor,
    id: i64,
    update: UpdateDepartmentRequest,
) -> Result<Department> {
    let (department, scope) = chain::load_department(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Update, Target::department(&department), &scope)
        .await?;

    if let Some(ref name) = update.name {
        require_text("name", name)?;
    }
    if let Some(ref code) = update.code {
        check("invalid_code", validate_code(code))?;
    }

    let updated = ctx
        .storage
        .update_department(id, update)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("Department {id} not found")))?;
    ctx.invalidate(EntityKind::Department, id).await;

    info!("Department {} updated by user {}", id, actor.user_id);
    Ok(updated)
}

/// 停用院系后，其下全部课程内容对非管理员不可访问
pub async fn set_department_active(
    ctx: &LmsContext,
    actor: &Actor,
    id: i64,
    active: bool,
) -> Result<Department> {
    let (department, scope) = chain::load_department(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Update, Target::department(&department), &scope)
        .await?;

    let updated = ctx
        .storage
        .set_department_active(id, active)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("Department {id} not found")))?;
    ctx.invalidate(EntityKind::Department, id).await;
    // 课程列表按院系状态过滤
    ctx.invalidate_lists(EntityKind::Course).await;

    info!(
        "Department {} set active={} by user {}",
        id, active, actor.user_id
    );
    Ok(updated)
}
