use std::sync::Arc;

use crate::errors::Result;
use crate::lifecycle::publish::PublishState;
use crate::media::MediaStore;
use crate::models::{
    PaginatedResponse,
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    course_modules::{
        entities::CourseModule,
        requests::{CreateModuleRequest, UpdateModuleRequest},
    },
    courses::{
        entities::Course,
        requests::{CourseQuery, CreateCourseRequest, UpdateCourseRequest},
    },
    departments::{
        entities::Department,
        requests::{CreateDepartmentRequest, DepartmentListParams, UpdateDepartmentRequest},
    },
    enrollments::{
        entities::{Enrollment, EnrollmentRole},
        requests::EnrollmentListParams,
        responses::{MyEnrollment, Participant},
    },
    lessons::{
        entities::Lesson,
        requests::{CreateLessonRequest, UpdateLessonRequest},
    },
    media::MediaRef,
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::MySubmissionListParams,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UserListParams},
    },
};

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn count_users(&self) -> Result<u64>;
    async fn list_users_with_pagination(
        &self,
        params: UserListParams,
    ) -> Result<PaginatedResponse<User>>;
    async fn set_user_active(&self, id: i64, active: bool) -> Result<Option<User>>;

    /// 院系管理方法
    async fn create_department(
        &self,
        req: CreateDepartmentRequest,
        created_by: i64,
    ) -> Result<Department>;
    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>>;
    async fn list_departments_with_pagination(
        &self,
        params: DepartmentListParams,
        active_only: bool,
    ) -> Result<PaginatedResponse<Department>>;
    async fn update_department(
        &self,
        id: i64,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>>;
    async fn set_department_active(&self, id: i64, active: bool) -> Result<Option<Department>>;
    async fn list_inactive_department_ids(&self) -> Result<Vec<i64>>;

    /// 课程管理方法
    // 指定 teacher_id 时在同一事务中以 teacher 身份选课
    async fn create_course(
        &self,
        req: CreateCourseRequest,
        created_by: i64,
        enrolled_by: i64,
    ) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseQuery,
    ) -> Result<PaginatedResponse<Course>>;
    async fn update_course(&self, id: i64, update: UpdateCourseRequest)
    -> Result<Option<Course>>;
    async fn set_course_published(&self, id: i64, state: PublishState) -> Result<Option<Course>>;
    // 课程下仍有单元或作业时返回 Conflict
    async fn delete_course(&self, id: i64) -> Result<bool>;

    /// 单元管理方法
    async fn create_module(
        &self,
        course_id: i64,
        req: CreateModuleRequest,
        created_by: i64,
    ) -> Result<CourseModule>;
    async fn get_module_by_id(&self, id: i64) -> Result<Option<CourseModule>>;
    async fn list_modules_with_pagination(
        &self,
        course_id: i64,
        active_only: bool,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<CourseModule>>;
    async fn update_module(
        &self,
        id: i64,
        update: UpdateModuleRequest,
    ) -> Result<Option<CourseModule>>;
    async fn set_module_active(&self, id: i64, active: bool) -> Result<Option<CourseModule>>;
    // 事务内删除课时与单元，提交前删除全部课时文件
    async fn delete_module_cascade(&self, id: i64, media: &dyn MediaStore) -> Result<bool>;

    /// 课时管理方法
    async fn create_lesson(
        &self,
        module: &CourseModule,
        req: CreateLessonRequest,
        files: Vec<MediaRef>,
        created_by: i64,
    ) -> Result<Lesson>;
    async fn get_lesson_by_id(&self, id: i64) -> Result<Option<Lesson>>;
    async fn list_lessons_with_pagination(
        &self,
        module_id: i64,
        active_only: bool,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<Lesson>>;
    // files 为 Some 时整体替换
    async fn update_lesson(
        &self,
        id: i64,
        update: UpdateLessonRequest,
        files: Option<Vec<MediaRef>>,
    ) -> Result<Option<Lesson>>;
    async fn set_lesson_active(&self, id: i64, active: bool) -> Result<Option<Lesson>>;
    // 重新编号同单元的后续课时，提交后尽力释放文件
    async fn delete_lesson(&self, id: i64, media: &dyn MediaStore) -> Result<bool>;

    /// 作业管理方法
    async fn create_assignment(
        &self,
        course_id: i64,
        req: CreateAssignmentRequest,
        attachments: Vec<MediaRef>,
        created_by: i64,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        course_id: i64,
        visible_only: bool,
        active_modules_only: bool,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<Assignment>>;
    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
        attachments: Option<Vec<MediaRef>>,
    ) -> Result<Option<Assignment>>;
    async fn set_assignment_published(
        &self,
        id: i64,
        state: PublishState,
    ) -> Result<Option<Assignment>>;
    async fn soft_delete_assignment(&self, id: i64) -> Result<bool>;

    /// 选课管理方法
    async fn enroll(
        &self,
        user_id: i64,
        course_id: i64,
        role: EnrollmentRole,
        enrolled_by: i64,
    ) -> Result<Enrollment>;
    async fn get_enrollment(&self, user_id: i64, course_id: i64) -> Result<Option<Enrollment>>;
    async fn list_enrollments_with_pagination(
        &self,
        course_id: i64,
        params: EnrollmentListParams,
    ) -> Result<PaginatedResponse<Participant>>;
    async fn list_participants(&self, course_id: i64) -> Result<Vec<Participant>>;
    async fn list_user_enrollments(&self, user_id: i64) -> Result<Vec<MyEnrollment>>;
    // 移除唯一教师时返回 last_teacher
    async fn remove_enrollment(&self, user_id: i64, course_id: i64) -> Result<bool>;

    /// 提交管理方法
    async fn create_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        text_answer: Option<String>,
        files: Vec<MediaRef>,
        status: SubmissionStatus,
    ) -> Result<Submission>;
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    async fn find_live_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    async fn list_assignment_submissions(
        &self,
        assignment_id: i64,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<Submission>>;
    async fn list_live_submissions(&self, assignment_id: i64) -> Result<Vec<Submission>>;
    async fn list_student_submissions(
        &self,
        student_id: i64,
        params: MySubmissionListParams,
    ) -> Result<PaginatedResponse<Submission>>;
    // 以下写入以当前状态为条件：状态已不允许时返回 already_graded / submission_deleted
    async fn update_submission_content(
        &self,
        id: i64,
        text_answer: Option<String>,
        files: Option<Vec<MediaRef>>,
        allow_graded: bool,
    ) -> Result<Option<Submission>>;
    async fn grade_submission(
        &self,
        id: i64,
        grade: f64,
        feedback: Option<String>,
        graded_by: i64,
        allow_regrade: bool,
    ) -> Result<Option<Submission>>;
    async fn soft_delete_submission(&self, id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
