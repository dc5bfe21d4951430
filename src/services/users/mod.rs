//! 用户目录：凭证由外部身份服务管理，这里只维护资料、全局角色与启用状态

pub mod create;
pub mod get;
pub mod list;
pub mod update;

pub use create::create_user;
pub use get::{get_current_user, get_user};
pub use list::list_users;
pub use update::set_user_active;

use crate::access::{Actor, DenyReason};
use crate::errors::Result;
use crate::models::users::entities::GlobalRole;

/// 用户管理不属于课程层级，直接按全局角色判定
pub(crate) fn require_roles(actor: &Actor, roles: &[&GlobalRole]) -> Result<()> {
    if roles.contains(&&actor.role) {
        Ok(())
    } else {
        Err(DenyReason::NotAuthorized.into())
    }
}
