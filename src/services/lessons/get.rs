use crate::access::{Actor, Operation, Target, chain};
use crate::errors::Result;
use crate::models::lessons::entities::Lesson;
use crate::services::LmsContext;

pub async fn get_lesson(ctx: &LmsContext, actor: &Actor, id: i64) -> Result<Lesson> {
    let (lesson, scope) = chain::load_lesson(ctx.storage.as_ref(), id).await?;
    ctx.authorize(actor, Operation::Read, Target::lesson(&lesson), &scope)
        .await?;
    Ok(lesson)
}
