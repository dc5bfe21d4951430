use chrono::Utc;
use tracing::info;

use crate::access::{Actor, ChainLink, EntityKind, Operation, Target, chain};
use crate::errors::{LmsError, Result};
use crate::lifecycle::publish::{validate_due_date, validate_max_marks};
use crate::media::{self, UploadedFile};
use crate::models::assignments::{entities::Assignment, requests::CreateAssignmentRequest};
use crate::services::LmsContext;
use crate::utils::validate::require_text;

pub async fn create_assignment(
    ctx: &LmsContext,
    actor: &Actor,
    course_id: i64,
    req: CreateAssignmentRequest,
    files: Vec<UploadedFile>,
) -> Result<Assignment> {
    // 挂在单元下时以单元为最近的父级
    let scope = match req.module_id {
        Some(module_id) => {
            let (module, scope) = chain::load_module(ctx.storage.as_ref(), module_id).await?;
            if module.course_id != course_id {
                return Err(LmsError::validation_with_reason(
                    "module_not_in_course",
                    format!("Module {module_id} does not belong to course {course_id}"),
                ));
            }
            scope.below(ChainLink::module(&module))
        }
        None => {
            let (course, scope) = chain::load_course(ctx.storage.as_ref(), course_id).await?;
            scope.below(ChainLink::course(&course))
        }
    };
    ctx.authorize(
        actor,
        Operation::Create,
        Target::new(EntityKind::Assignment),
        &scope,
    )
    .await?;

    require_text("title", &req.title)?;
    validate_due_date(req.due_date, Utc::now())?;
    validate_max_marks(req.max_marks)?;
    media::check_uploads(&files, &ctx.upload)?;

    let folder = format!("assignments/{course_id}");
    let refs = media::put_all(ctx.media.as_ref(), &files, &folder).await?;

    let assignment = match ctx
        .storage
        .create_assignment(course_id, req, refs.clone(), actor.user_id)
        .await
    {
        Ok(assignment) => assignment,
        Err(e) => {
            media::release_all(ctx.media.as_ref(), &refs).await;
            return Err(e);
        }
    };
    ctx.invalidate(EntityKind::Assignment, assignment.id).await;

    info!(
        "Assignment {} created in course {} by user {}",
        assignment.id, course_id, actor.user_id
    );
    Ok(assignment)
}
