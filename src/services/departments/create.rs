use tracing::info;

use crate::access::{Actor, EntityKind, Operation, Scope, Target};
use crate::errors::Result;
use crate::models::departments::{entities::Department, requests::CreateDepartmentRequest};
use crate::services::LmsContext;
use crate::utils::validate::{check, require_text, validate_code};

pub async fn create_department(
    ctx: &LmsContext,
    actor: &Actor,
    req: CreateDepartmentRequest,
) -> Result<Department> {
    ctx.authorize(
        actor,
        Operation::Create,
        Target::new(EntityKind::Department),
        &Scope::root(),
    )
    .await?;

    require_text("name", &req.name)?;
    check("invalid_code", validate_code(&req.code))?;

    // 名称与代码的唯一性由唯一索引保证
    let department = ctx.storage.create_department(req, actor.user_id).await?;
    ctx.invalidate(EntityKind::Department, department.id).await;

    info!(
        "Department {} ({}) created by user {}",
        department.name, department.code, actor.user_id
    );
    Ok(department)
}
