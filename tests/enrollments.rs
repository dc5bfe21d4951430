mod common;

use common::setup;
use rust_lms_next::models::{
    courses::requests::CreateCourseRequest,
    enrollments::{
        entities::EnrollmentRole,
        requests::{EnrollRequest, EnrollmentListParams},
    },
    users::entities::GlobalRole,
};
use rust_lms_next::services::{courses, enrollments, reports};

#[tokio::test]
async fn last_teacher_cannot_be_removed() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let manager = env.user("manager1", GlobalRole::Manager).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;

    let err = enrollments::remove_enrollment(&env.ctx, &manager, course.id, teacher.user_id)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "last_teacher");

    // 有第二位教师后可以移除
    let second = env.user("teacher2", GlobalRole::Teacher).await;
    env.enroll(course.id, &second, EnrollmentRole::Teacher).await;
    enrollments::remove_enrollment(&env.ctx, &manager, course.id, teacher.user_id)
        .await
        .unwrap();

    let groups = enrollments::list_participants(&env.ctx, &manager, course.id)
        .await
        .unwrap();
    assert_eq!(groups.teachers.len(), 1);
    assert_eq!(groups.teachers[0].user.id, second.user_id);
}

#[tokio::test]
async fn concurrent_removals_keep_one_teacher() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let second = env.user("teacher2", GlobalRole::Teacher).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;
    env.enroll(course.id, &second, EnrollmentRole::Teacher).await;

    let storage = env.ctx.storage.clone();
    let (a, b) = tokio::join!(
        storage.remove_enrollment(teacher.user_id, course.id),
        storage.remove_enrollment(second.user_id, course.id),
    );

    let results = [a, b];
    assert_eq!(results.iter().filter(|r| matches!(r, Ok(true))).count(), 1);
    let denied = results.iter().find_map(|r| r.as_ref().err()).unwrap();
    assert_eq!(denied.reason(), "last_teacher");

    let groups = enrollments::list_participants(&env.ctx, &env.admin, course.id)
        .await
        .unwrap();
    assert_eq!(groups.teachers.len(), 1);
}

#[tokio::test]
async fn duplicate_enrollment_conflicts() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let student = env.user("student1", GlobalRole::Student).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;
    env.enroll(course.id, &student, EnrollmentRole::Student).await;

    let err = enrollments::enroll_user(
        &env.ctx,
        &env.admin,
        course.id,
        EnrollRequest {
            user_id: student.user_id,
            role: EnrollmentRole::Student,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.reason(), "already_enrolled");
}

#[tokio::test]
async fn enrollment_role_must_match_global_role() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let student = env.user("student1", GlobalRole::Student).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;

    let err = enrollments::enroll_user(
        &env.ctx,
        &env.admin,
        course.id,
        EnrollRequest {
            user_id: student.user_id,
            role: EnrollmentRole::Teacher,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.reason(), "role_mismatch");
    assert_eq!(err.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn teacher_cannot_enroll_students() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let student = env.user("student1", GlobalRole::Student).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;

    let err = enrollments::enroll_user(
        &env.ctx,
        &teacher,
        course.id,
        EnrollRequest {
            user_id: student.user_id,
            role: EnrollmentRole::Student,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.reason(), "not_authorized");
}

#[tokio::test]
async fn roster_and_summary_follow_enrollments() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;
    let first = env.user("student1", GlobalRole::Student).await;
    env.enroll(course.id, &first, EnrollmentRole::Student).await;

    let summary = reports::enrollment_summary(&env.ctx, &teacher, course.id)
        .await
        .unwrap();
    assert_eq!((summary.teachers, summary.students, summary.total), (1, 1, 2));

    let second = env.user("student2", GlobalRole::Student).await;
    env.enroll(course.id, &second, EnrollmentRole::Student).await;

    let summary = reports::enrollment_summary(&env.ctx, &teacher, course.id)
        .await
        .unwrap();
    assert_eq!(summary.students, 2);

    let students = enrollments::list_enrollments(
        &env.ctx,
        &teacher,
        course.id,
        EnrollmentListParams {
            role: Some(EnrollmentRole::Student),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(students.pagination.total, 2);

    let err = enrollments::list_enrollments(
        &env.ctx,
        &first,
        course.id,
        EnrollmentListParams::default(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.reason(), "not_authorized");
}

#[tokio::test]
async fn my_enrollments_hide_unpublished_courses_from_students() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let student = env.user("student1", GlobalRole::Student).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;
    env.enroll(course.id, &student, EnrollmentRole::Student).await;

    assert_eq!(
        enrollments::list_my_enrollments(&env.ctx, &student)
            .await
            .unwrap()
            .len(),
        1
    );

    courses::toggle_course_publish(&env.ctx, &teacher, course.id)
        .await
        .unwrap();
    assert!(
        enrollments::list_my_enrollments(&env.ctx, &student)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        enrollments::list_my_enrollments(&env.ctx, &teacher)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn course_with_content_cannot_be_deleted() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;
    env.module(course.id, &teacher).await;

    let err = courses::delete_course(&env.ctx, &env.admin, course.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), actix_web::http::StatusCode::CONFLICT);

    let empty = courses::create_course(
        &env.ctx,
        &env.admin,
        CreateCourseRequest {
            title: "Empty".into(),
            description: None,
            course_code: "CS999".into(),
            department_id: dept.id,
            teacher_id: None,
        },
    )
    .await
    .unwrap();
    courses::delete_course(&env.ctx, &env.admin, empty.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn duplicate_course_code_conflicts() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let dept = env.department("CS").await;
    env.published_course(dept.id, "CS101", &teacher).await;

    let err = courses::create_course(
        &env.ctx,
        &env.admin,
        CreateCourseRequest {
            title: "Again".into(),
            description: None,
            course_code: "CS101".into(),
            department_id: dept.id,
            teacher_id: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), actix_web::http::StatusCode::CONFLICT);
}
