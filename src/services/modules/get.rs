use crate::access::{Actor, Operation, Target, chain};
use crate::errors::Result;
use crate::models::course_modules::entities::CourseModule;
use crate::services::LmsContext;

pub async fn get_module(ctx: &LmsContext, actor: &Actor, id: i64) -> Result<CourseModule> {
    let (module, scope) = chain::load_module(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Read, Target::module(&module), &scope)
        .await?;
    Ok(module)
}
