//! 选课索引：用户在课程中的角色，是课程内一切权限的来源

pub mod enroll;
pub mod list;
pub mod remove;

pub use enroll::enroll_user;
pub use list::{list_enrollments, list_my_enrollments, list_participants};
pub use remove::remove_enrollment;

use crate::access::{Actor, EntityKind, Operation, Scope, Target};
use crate::errors::Result;
use crate::services::LmsContext;

/// 名单类读取（选课名单、提交列表、统计）：课程教师、教务管理与管理员
pub(crate) async fn authorize_roster(ctx: &LmsContext, actor: &Actor, scope: &Scope) -> Result<()> {
    ctx.authorize(
        actor,
        Operation::Read,
        Target::new(EntityKind::Enrollment),
        scope,
    )
    .await
}

/// 选课变化会影响成员课程列表与提交状态统计
async fn invalidate_membership(ctx: &LmsContext, enrollment_id: i64) {
    ctx.invalidate(EntityKind::Enrollment, enrollment_id).await;
    ctx.invalidate_lists(EntityKind::Course).await;
    ctx.invalidate_lists(EntityKind::Submission).await;
}
