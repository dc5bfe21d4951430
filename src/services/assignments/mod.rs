//! 作业：属于课程，可选挂在同课程的单元下；删除为软删除

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod publish;
pub mod update;

pub use create::create_assignment;
pub use delete::delete_assignment;
pub use get::get_assignment;
pub use list::list_assignments;
pub use publish::toggle_assignment_publish;
pub use update::update_assignment;

use crate::access::{Scope, chain};
use crate::errors::{LmsError, Result};
use crate::models::assignments::entities::Assignment;
use crate::storage::Storage;

/// 加载未删除的作业，已软删除的视为不存在
pub(crate) async fn load_live_assignment(
    storage: &dyn Storage,
    id: i64,
) -> Result<(Assignment, Scope)> {
    let (assignment, scope) = chain::load_assignment(storage, id).await?;
    if assignment.deleted_at.is_some() {
        return Err(LmsError::not_found(format!("Assignment {id} not found")));
    }
    Ok((assignment, scope))
}
