//! 课程：教务管理创建，负责教师维护，学生只看到已发布且已选修的课程

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod publish;
pub mod update;

pub use create::create_course;
pub use delete::delete_course;
pub use get::get_course;
pub use list::{list_courses, list_my_courses};
pub use publish::toggle_course_publish;
pub use update::update_course;
