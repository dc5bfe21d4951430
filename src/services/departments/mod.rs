//! 院系：管理员与教务管理可增改，所有登录用户可读

pub mod create;
pub mod get;
pub mod list;
pub mod update;

pub use create::create_department;
pub use get::get_department;
pub use list::list_departments;
pub use update::{set_department_active, update_department};
