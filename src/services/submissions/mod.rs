//! 提交生命周期：submitted / late → graded，submitted / late → deleted

pub mod create;
pub mod delete;
pub mod get;
pub mod grade;
pub mod list;
pub mod update;

pub use create::create_submission;
pub use delete::delete_submission;
pub use get::get_submission;
pub use grade::grade_submission;
pub use list::{list_assignment_submissions, list_my_submissions};
pub use update::update_submission;
