use tracing::info;

use crate::access::{Actor, ChainLink, EntityKind, Operation, Target, chain};
use crate::errors::Result;
use crate::models::course_modules::{entities::CourseModule, requests::CreateModuleRequest};
use crate::services::LmsContext;
use crate::utils::validate::require_text;

pub async fn create_module(
    ctx: &LmsContext,
    actor: &Actor,
    course_id: i64,
    req: CreateModuleRequest,
) -> Result<CourseModule> {
    let (course, scope) = chain::load_course(ctx.storage.as_ref(), course_id).await?;
    let scope = scope.below(ChainLink::course(&course));
    ctx.authorize(actor, Operation::Create, Target::new(EntityKind::Module), &scope)
        .await?;

    require_text("title", &req.title)?;

    let module = ctx
        .storage
        .create_module(course_id, req, actor.user_id)
        .await?;
    ctx.invalidate(EntityKind::Module, module.id).await;

    info!(
        "Module {} created in course {} by user {}",
        module.id, course_id, actor.user_id
    );
    Ok(module)
}
