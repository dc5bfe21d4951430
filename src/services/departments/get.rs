use crate::access::{Actor, Operation, Target, chain};
use crate::errors::Result;
use crate::models::departments::entities::Department;
use crate::services::LmsContext;

pub async fn get_department(ctx: &LmsContext, actor: &Actor, id: i64) -> Result<Department> {
    let (department, scope) = chain::load_department(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Read, Target::department(&department), &scope)
        .await?;
    Ok(department)
}
