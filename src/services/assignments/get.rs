use super::load_live_assignment;
use crate::access::{Actor, Operation, Target};
use crate::errors::Result;
use crate::models::assignments::entities::Assignment;
use crate::services::LmsContext;

pub async fn get_assignment(ctx: &LmsContext, actor: &Actor, id: i64) -> Result<Assignment> {
    let (assignment, scope) = load_live_assignment(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Read, Target::assignment(&assignment), &scope)
        .await?;
    Ok(assignment)
}
