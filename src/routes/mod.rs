pub mod assignments;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod lessons;
pub mod modules;
pub mod submissions;
pub mod users;

pub use assignments::configure_assignment_routes;
pub use courses::configure_course_routes;
pub use departments::configure_department_routes;
pub use enrollments::configure_enrollment_routes;
pub use lessons::configure_lesson_routes;
pub use modules::configure_module_routes;
pub use submissions::configure_submission_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部 `/api/v1` 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_user_routes)
        .configure(configure_department_routes)
        .configure(configure_course_routes)
        .configure(configure_enrollment_routes)
        .configure(configure_module_routes)
        .configure(configure_lesson_routes)
        .configure(configure_assignment_routes)
        .configure(configure_submission_routes);
}
