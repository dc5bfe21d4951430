use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "lms/course.ts")]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub course_code: String,
    pub department_id: i64,
    /// 负责教师，创建时自动以 teacher 身份选课
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "lms/course.ts")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub department_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "lms/course.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub department_id: Option<i64>,
    pub search: Option<String>,
}

// 课程列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct CourseQuery {
    pub page: u64,
    pub size: u64,
    pub department_id: Option<i64>,
    pub search: Option<String>,
    /// 仅返回该用户选修/任教的课程
    pub member_id: Option<i64>,
    pub published_only: bool,
    /// 排除所属院系已停用的课程
    pub active_departments_only: bool,
}
