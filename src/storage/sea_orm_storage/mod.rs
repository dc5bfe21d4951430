//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 事务内的语句只能使用事务句柄，连接池可能只有一个连接。

mod assignments;
mod courses;
mod departments;
mod enrollments;
mod lessons;
mod modules;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use crate::models::{PaginatedResponse, PaginationInfo};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Select,
    SqlErr,
};
use std::time::Duration;
use tracing::info;
use ts_rs::TS;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect_with(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect_with(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + 外键约束）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");
        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LmsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("temp_store", "memory");
        if !in_memory {
            opt = opt.journal_mode(SqliteJournalMode::Wal);
        }

        // 内存库每个连接各自独立，只能使用单连接
        let max_connections = if in_memory { 1 } else { pool_size.max(1) };
        let mut pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(timeout));
        if in_memory {
            pool = pool.idle_timeout(None).max_lifetime(None);
        } else {
            pool = pool.idle_timeout(Duration::from_secs(300));
        }

        let pool = pool
            .connect_with(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LmsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite:, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 唯一索引冲突转为 Conflict(duplicate)，其余为数据库操作错误
pub(crate) fn db_err(context: &'static str) -> impl Fn(DbErr) -> LmsError {
    move |e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            LmsError::conflict_with_reason("duplicate", format!("{context}: 记录已存在"))
        }
        _ => LmsError::database_operation(format!("{context}: {e}")),
    }
}

/// 分页查询并转换为业务模型，page 从 1 开始
pub(crate) async fn fetch_page<E, T>(
    db: &DatabaseConnection,
    select: Select<E>,
    page: u64,
    size: u64,
    convert: impl Fn(E::Model) -> T,
) -> Result<PaginatedResponse<T>>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    T: TS,
{
    let paginator = select.paginate(db, size);
    let total = paginator.num_items().await.map_err(db_err("查询总数失败"))?;
    let pages = paginator.num_pages().await.map_err(db_err("查询页数失败"))?;
    let models = paginator
        .fetch_page(page.max(1) - 1)
        .await
        .map_err(db_err("查询列表失败"))?;

    Ok(PaginatedResponse {
        items: models.into_iter().map(convert).collect(),
        pagination: PaginationInfo::new(page, size, total, pages),
    })
}

// Storage trait 实现
use crate::lifecycle::publish::PublishState;
use crate::media::MediaStore;
use crate::models::{
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn list_users_with_pagination(
        &self,
        params: UserListParams,
    ) -> Result<PaginatedResponse<User>> {
        self.list_users_with_pagination_impl(params).await
    }

    async fn set_user_active(&self, id: i64, active: bool) -> Result<Option<User>> {
        self.set_user_active_impl(id, active).await
    }

    // 院系模块
    async fn create_department(
        &self,
        req: CreateDepartmentRequest,
        created_by: i64,
    ) -> Result<Department> {
        self.create_department_impl(req, created_by).await
    }

    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>> {
        self.get_department_by_id_impl(id).await
    }

    async fn list_departments_with_pagination(
        &self,
        params: DepartmentListParams,
        active_only: bool,
    ) -> Result<PaginatedResponse<Department>> {
        self.list_departments_with_pagination_impl(params, active_only)
            .await
    }

    async fn update_department(
        &self,
        id: i64,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>> {
        self.update_department_impl(id, update).await
    }

    async fn set_department_active(&self, id: i64, active: bool) -> Result<Option<Department>> {
        self.set_department_active_impl(id, active).await
    }

    async fn list_inactive_department_ids(&self) -> Result<Vec<i64>> {
        self.list_inactive_department_ids_impl().await
    }

    // 课程模块
    async fn create_course(
        &self,
        req: CreateCourseRequest,
        created_by: i64,
        enrolled_by: i64,
    ) -> Result<Course> {
        self.create_course_impl(req, created_by, enrolled_by).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseQuery,
    ) -> Result<PaginatedResponse<Course>> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn update_course(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn set_course_published(&self, id: i64, state: PublishState) -> Result<Option<Course>> {
        self.set_course_published_impl(id, state).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    // 单元模块
    async fn create_module(
        &self,
        course_id: i64,
        req: CreateModuleRequest,
        created_by: i64,
    ) -> Result<CourseModule> {
        self.create_module_impl(course_id, req, created_by).await
    }

    async fn get_module_by_id(&self, id: i64) -> Result<Option<CourseModule>> {
        self.get_module_by_id_impl(id).await
    }

    async fn list_modules_with_pagination(
        &self,
        course_id: i64,
        active_only: bool,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<CourseModule>> {
        self.list_modules_with_pagination_impl(course_id, active_only, page, size)
            .await
    }

    async fn update_module(
        &self,
        id: i64,
        update: UpdateModuleRequest,
    ) -> Result<Option<CourseModule>> {
        self.update_module_impl(id, update).await
    }

    async fn set_module_active(&self, id: i64, active: bool) -> Result<Option<CourseModule>> {
        self.set_module_active_impl(id, active).await
    }

    async fn delete_module_cascade(&self, id: i64, media: &dyn MediaStore) -> Result<bool> {
        self.delete_module_cascade_impl(id, media).await
    }

    // 课时模块
    async fn create_lesson(
        &self,
        module: &CourseModule,
        req: CreateLessonRequest,
        files: Vec<MediaRef>,
        created_by: i64,
    ) -> Result<Lesson> {
        self.create_lesson_impl(module, req, files, created_by).await
    }

    async fn get_lesson_by_id(&self, id: i64) -> Result<Option<Lesson>> {
        self.get_lesson_by_id_impl(id).await
    }

    async fn list_lessons_with_pagination(
        &self,
        module_id: i64,
        active_only: bool,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<Lesson>> {
        self.list_lessons_with_pagination_impl(module_id, active_only, page, size)
            .await
    }

    async fn update_lesson(
        &self,
        id: i64,
        update: UpdateLessonRequest,
        files: Option<Vec<MediaRef>>,
    ) -> Result<Option<Lesson>> {
        self.update_lesson_impl(id, update, files).await
    }

    async fn set_lesson_active(&self, id: i64, active: bool) -> Result<Option<Lesson>> {
        self.set_lesson_active_impl(id, active).await
    }

    async fn delete_lesson(&self, id: i64, media: &dyn MediaStore) -> Result<bool> {
        self.delete_lesson_impl(id, media).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        course_id: i64,
        req: CreateAssignmentRequest,
        attachments: Vec<MediaRef>,
        created_by: i64,
    ) -> Result<Assignment> {
        self.create_assignment_impl(course_id, req, attachments, created_by)
            .await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        course_id: i64,
        visible_only: bool,
        active_modules_only: bool,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<Assignment>> {
        self.list_assignments_with_pagination_impl(
            course_id,
            visible_only,
            active_modules_only,
            page,
            size,
        )
        .await
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
        attachments: Option<Vec<MediaRef>>,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update, attachments).await
    }

    async fn set_assignment_published(
        &self,
        id: i64,
        state: PublishState,
    ) -> Result<Option<Assignment>> {
        self.set_assignment_published_impl(id, state).await
    }

    async fn soft_delete_assignment(&self, id: i64) -> Result<bool> {
        self.soft_delete_assignment_impl(id).await
    }

    // 选课模块
    async fn enroll(
        &self,
        user_id: i64,
        course_id: i64,
        role: EnrollmentRole,
        enrolled_by: i64,
    ) -> Result<Enrollment> {
        self.enroll_impl(user_id, course_id, role, enrolled_by).await
    }

    async fn get_enrollment(&self, user_id: i64, course_id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(user_id, course_id).await
    }

    async fn list_enrollments_with_pagination(
        &self,
        course_id: i64,
        params: EnrollmentListParams,
    ) -> Result<PaginatedResponse<Participant>> {
        self.list_enrollments_with_pagination_impl(course_id, params)
            .await
    }

    async fn list_participants(&self, course_id: i64) -> Result<Vec<Participant>> {
        self.list_participants_impl(course_id).await
    }

    async fn list_user_enrollments(&self, user_id: i64) -> Result<Vec<MyEnrollment>> {
        self.list_user_enrollments_impl(user_id).await
    }

    async fn remove_enrollment(&self, user_id: i64, course_id: i64) -> Result<bool> {
        self.remove_enrollment_impl(user_id, course_id).await
    }

    // 提交模块
    async fn create_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        text_answer: Option<String>,
        files: Vec<MediaRef>,
        status: SubmissionStatus,
    ) -> Result<Submission> {
        self.create_submission_impl(assignment_id, student_id, text_answer, files, status)
            .await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn find_live_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.find_live_submission_impl(assignment_id, student_id)
            .await
    }

    async fn list_assignment_submissions(
        &self,
        assignment_id: i64,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<Submission>> {
        self.list_assignment_submissions_impl(assignment_id, page, size)
            .await
    }

    async fn list_live_submissions(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        self.list_live_submissions_impl(assignment_id).await
    }

    async fn list_student_submissions(
        &self,
        student_id: i64,
        params: MySubmissionListParams,
    ) -> Result<PaginatedResponse<Submission>> {
        self.list_student_submissions_impl(student_id, params).await
    }

    async fn update_submission_content(
        &self,
        id: i64,
        text_answer: Option<String>,
        files: Option<Vec<MediaRef>>,
        allow_graded: bool,
    ) -> Result<Option<Submission>> {
        self.update_submission_content_impl(id, text_answer, files, allow_graded)
            .await
    }

    async fn grade_submission(
        &self,
        id: i64,
        grade: f64,
        feedback: Option<String>,
        graded_by: i64,
        allow_regrade: bool,
    ) -> Result<Option<Submission>> {
        self.grade_submission_impl(id, grade, feedback, graded_by, allow_regrade)
            .await
    }

    async fn soft_delete_submission(&self, id: i64) -> Result<bool> {
        self.soft_delete_submission_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("lms.db").unwrap(),
            "sqlite://lms.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("sqlite::memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("redis://x").is_err());
    }
}
