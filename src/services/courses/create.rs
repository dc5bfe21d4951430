use tracing::info;

use crate::access::{Actor, ChainLink, EntityKind, Operation, Target, chain};
use crate::errors::{LmsError, Result};
use crate::lifecycle::enrollment::check_role_matches;
use crate::models::{
    courses::{entities::Course, requests::CreateCourseRequest},
    enrollments::entities::EnrollmentRole,
};
use crate::services::LmsContext;
use crate::utils::validate::{check, require_text, validate_code};

pub async fn create_course(
    ctx: &LmsContext,
    actor: &Actor,
    req: CreateCourseRequest,
) -> Result<Course> {
    let (department, dept_scope) =
        chain::load_department(ctx.storage.as_ref(), req.department_id).await?;
    let scope = dept_scope.below(ChainLink::department(&department));
    ctx.authorize(actor, Operation::Create, Target::new(EntityKind::Course), &scope)
        .await?;

    require_text("title", &req.title)?;
    check("invalid_code", validate_code(&req.course_code))?;

    // 负责教师必须是启用状态的教师账号
    if let Some(teacher_id) = req.teacher_id {
        let teacher = ctx
            .storage
            .get_user_by_id(teacher_id)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("User {teacher_id} not found")))?;
        if !teacher.active {
            return Err(LmsError::validation_with_reason(
                "user_inactive",
                format!("User {teacher_id} is inactive"),
            ));
        }
        check_role_matches(teacher.role, EnrollmentRole::Teacher)?;
    }

    let created_by = req.teacher_id.unwrap_or(actor.user_id);
    let course = ctx
        .storage
        .create_course(req, created_by, actor.user_id)
        .await?;

    ctx.invalidate(EntityKind::Course, course.id).await;
    ctx.invalidate_lists(EntityKind::Enrollment).await;

    info!(
        "Course {} ({}) created in department {} by user {}",
        course.title, course.course_code, course.department_id, actor.user_id
    );
    Ok(course)
}
