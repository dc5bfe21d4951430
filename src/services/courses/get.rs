use crate::access::{Actor, Operation, Target, chain};
use crate::errors::Result;
use crate::models::courses::entities::Course;
use crate::services::LmsContext;

pub async fn get_course(ctx: &LmsContext, actor: &Actor, id: i64) -> Result<Course> {
    let (course, scope) = chain::load_course(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Read, Target::course(&course), &scope)
        .await?;
    Ok(course)
}
