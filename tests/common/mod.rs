#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use rust_lms_next::access::Actor;
use rust_lms_next::cache::object_cache::moka::MokaCacheWrapper;
use rust_lms_next::config::UploadConfig;
use rust_lms_next::media::{MemoryMediaStore, UploadedFile};
use rust_lms_next::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    course_modules::{entities::CourseModule, requests::CreateModuleRequest},
    courses::{entities::Course, requests::CreateCourseRequest},
    departments::{entities::Department, requests::CreateDepartmentRequest},
    enrollments::{entities::EnrollmentRole, requests::EnrollRequest},
    lessons::{entities::Lesson, requests::CreateLessonRequest},
    users::{entities::GlobalRole, requests::CreateUserRequest},
};
use rust_lms_next::services::{
    LmsContext, assignments, courses, departments, enrollments, lessons, modules,
};
use rust_lms_next::storage::sea_orm_storage::SeaOrmStorage;

pub struct TestEnv {
    pub ctx: LmsContext,
    pub media: Arc<MemoryMediaStore>,
    pub admin: Actor,
}

pub fn upload_config() -> UploadConfig {
    UploadConfig {
        backend: "memory".into(),
        dir: "uploads".into(),
        public_url: "/media".into(),
        max_size: 1024,
        max_files: 5,
        allowed_types: vec![".pdf".into(), ".txt".into(), ".png".into()],
    }
}

pub async fn setup() -> TestEnv {
    let storage = SeaOrmStorage::connect_with("sqlite::memory:", 1, 5)
        .await
        .expect("in-memory database");
    let media = Arc::new(MemoryMediaStore::new());
    let ctx = LmsContext::with_settings(
        Arc::new(storage),
        Arc::new(MokaCacheWrapper::with_capacity(1000, 60)),
        media.clone(),
        60,
        upload_config(),
    );

    let admin_user = ctx
        .storage
        .create_user(CreateUserRequest {
            username: "admin".into(),
            email: "admin@example.com".into(),
            display_name: None,
            role: GlobalRole::Admin,
        })
        .await
        .expect("admin user");

    TestEnv {
        ctx,
        media,
        admin: Actor::new(admin_user.id, GlobalRole::Admin),
    }
}

impl TestEnv {
    pub async fn user(&self, username: &str, role: GlobalRole) -> Actor {
        let user = self
            .ctx
            .storage
            .create_user(CreateUserRequest {
                username: username.into(),
                email: format!("{username}@example.com"),
                display_name: None,
                role,
            })
            .await
            .expect("user");
        Actor::new(user.id, role)
    }

    pub async fn department(&self, code: &str) -> Department {
        departments::create_department(
            &self.ctx,
            &self.admin,
            CreateDepartmentRequest {
                name: format!("Department {code}"),
                code: code.into(),
                description: None,
            },
        )
        .await
        .expect("department")
    }

    /// 已发布课程，`teacher` 作为负责教师自动选课
    pub async fn published_course(&self, department_id: i64, code: &str, teacher: &Actor) -> Course {
        let course = courses::create_course(
            &self.ctx,
            &self.admin,
            CreateCourseRequest {
                title: format!("Course {code}"),
                description: None,
                course_code: code.into(),
                department_id,
                teacher_id: Some(teacher.user_id),
            },
        )
        .await
        .expect("course");
        courses::toggle_course_publish(&self.ctx, &self.admin, course.id)
            .await
            .expect("publish course")
    }

    pub async fn enroll(&self, course_id: i64, user: &Actor, role: EnrollmentRole) {
        enrollments::enroll_user(
            &self.ctx,
            &self.admin,
            course_id,
            EnrollRequest {
                user_id: user.user_id,
                role,
            },
        )
        .await
        .expect("enrollment");
    }

    pub async fn module(&self, course_id: i64, teacher: &Actor) -> CourseModule {
        modules::create_module(
            &self.ctx,
            teacher,
            course_id,
            CreateModuleRequest {
                title: "Week 1".into(),
                description: None,
            },
        )
        .await
        .expect("module")
    }

    pub async fn lesson(&self, module_id: i64, teacher: &Actor, title: &str, files: usize) -> Lesson {
        let uploads = (0..files)
            .map(|i| UploadedFile::new(format!("{title}-{i}.pdf"), vec![1, 2, 3]))
            .collect();
        lessons::create_lesson(
            &self.ctx,
            teacher,
            module_id,
            CreateLessonRequest {
                title: title.into(),
                text_content: Some(format!("Notes for {title}")),
                ..Default::default()
            },
            uploads,
        )
        .await
        .expect("lesson")
    }

    /// 已发布作业，截止时间为 `due`
    pub async fn published_assignment(
        &self,
        course_id: i64,
        teacher: &Actor,
        due: DateTime<Utc>,
        max_marks: f64,
    ) -> Assignment {
        let assignment = assignments::create_assignment(
            &self.ctx,
            teacher,
            course_id,
            CreateAssignmentRequest {
                title: "Essay".into(),
                description: None,
                module_id: None,
                due_date: due,
                max_marks,
            },
            vec![],
        )
        .await
        .expect("assignment");
        assignments::toggle_assignment_publish(&self.ctx, teacher, assignment.id)
            .await
            .expect("publish assignment")
    }
}

pub fn in_hours(hours: i64) -> DateTime<Utc> {
    Utc::now() + Duration::hours(hours)
}
