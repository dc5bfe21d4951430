mod common;

use chrono::Duration;
use common::{in_hours, setup};
use rust_lms_next::media::UploadedFile;
use rust_lms_next::models::{
    assignments::requests::UpdateAssignmentRequest,
    enrollments::entities::EnrollmentRole,
    submissions::{
        entities::SubmissionStatus,
        requests::{GradeSubmissionRequest, SubmitRequest},
    },
    users::entities::GlobalRole,
};
use rust_lms_next::services::{assignments, reports, submissions};

fn answer(text: &str) -> SubmitRequest {
    SubmitRequest {
        text_answer: Some(text.into()),
    }
}

fn grade(value: f64) -> GradeSubmissionRequest {
    GradeSubmissionRequest {
        grade: value,
        feedback: Some("ok".into()),
    }
}

#[tokio::test]
async fn grading_locks_the_submission() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let student = env.user("student1", GlobalRole::Student).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;
    env.enroll(course.id, &student, EnrollmentRole::Student).await;
    let assignment = env
        .published_assignment(course.id, &teacher, in_hours(1), 100.0)
        .await;

    let submission =
        submissions::create_submission(&env.ctx, &student, assignment.id, answer("v1"), vec![])
            .await
            .unwrap();
    assert_eq!(submission.status, SubmissionStatus::Submitted);
    assert!(!submission.is_late);

    let err = submissions::grade_submission(&env.ctx, &teacher, submission.id, grade(150.0))
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "grade_out_of_range");

    let graded = submissions::grade_submission(&env.ctx, &teacher, submission.id, grade(90.0))
        .await
        .unwrap();
    assert_eq!(graded.status, SubmissionStatus::Graded);
    assert_eq!(graded.grade, Some(90.0));
    assert_eq!(graded.graded_by, Some(teacher.user_id));

    let err = submissions::update_submission(&env.ctx, &student, submission.id, answer("v2"), None)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "already_graded");

    let err = submissions::grade_submission(&env.ctx, &teacher, submission.id, grade(80.0))
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "already_graded");

    // 管理员可以重新评分
    let regraded = submissions::grade_submission(&env.ctx, &env.admin, submission.id, grade(95.0))
        .await
        .unwrap();
    assert_eq!(regraded.grade, Some(95.0));

    let err = submissions::delete_submission(&env.ctx, &student, submission.id)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "already_graded");
}

#[tokio::test]
async fn storage_writes_refuse_a_graded_submission() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let student = env.user("student1", GlobalRole::Student).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;
    env.enroll(course.id, &student, EnrollmentRole::Student).await;
    let assignment = env
        .published_assignment(course.id, &teacher, in_hours(1), 100.0)
        .await;

    let submission =
        submissions::create_submission(&env.ctx, &student, assignment.id, answer("v1"), vec![])
            .await
            .unwrap();
    submissions::grade_submission(&env.ctx, &teacher, submission.id, grade(90.0))
        .await
        .unwrap();

    // 服务层检查之后才到达的写入，由存储层按状态拒绝
    let storage = env.ctx.storage.clone();
    let err = storage
        .soft_delete_submission(submission.id)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "already_graded");

    let err = storage
        .grade_submission(submission.id, 10.0, None, teacher.user_id, false)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "already_graded");

    let err = storage
        .update_submission_content(submission.id, Some("v2".into()), None, false)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "already_graded");

    let current = storage
        .get_submission_by_id(submission.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.status, SubmissionStatus::Graded);
    assert_eq!(current.grade, Some(90.0));
    assert_eq!(current.text_answer.as_deref(), Some("v1"));

    let regraded = storage
        .grade_submission(submission.id, 95.0, None, env.admin.user_id, true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(regraded.grade, Some(95.0));
    assert_eq!(regraded.status, SubmissionStatus::Graded);

    // 已删除的提交同样不能再评分
    let other = env.user("student2", GlobalRole::Student).await;
    env.enroll(course.id, &other, EnrollmentRole::Student).await;
    let pending =
        submissions::create_submission(&env.ctx, &other, assignment.id, answer("x"), vec![])
            .await
            .unwrap();
    assert!(storage.soft_delete_submission(pending.id).await.unwrap());
    let err = storage
        .grade_submission(pending.id, 50.0, None, teacher.user_id, false)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "submission_deleted");
    assert!(
        storage
            .grade_submission(999_999, 50.0, None, teacher.user_id, false)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn second_live_submission_conflicts() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let student = env.user("student1", GlobalRole::Student).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;
    env.enroll(course.id, &student, EnrollmentRole::Student).await;
    let assignment = env
        .published_assignment(course.id, &teacher, in_hours(1), 10.0)
        .await;

    let first =
        submissions::create_submission(&env.ctx, &student, assignment.id, answer("a"), vec![])
            .await
            .unwrap();
    let err =
        submissions::create_submission(&env.ctx, &student, assignment.id, answer("b"), vec![])
            .await
            .unwrap_err();
    assert_eq!(err.reason(), "duplicate_submission");

    // 删除后可以重新提交
    submissions::delete_submission(&env.ctx, &student, first.id)
        .await
        .unwrap();
    let second =
        submissions::create_submission(&env.ctx, &student, assignment.id, answer("c"), vec![])
            .await
            .unwrap();
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn submission_needs_text_or_file() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let student = env.user("student1", GlobalRole::Student).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;
    env.enroll(course.id, &student, EnrollmentRole::Student).await;
    let assignment = env
        .published_assignment(course.id, &teacher, in_hours(1), 10.0)
        .await;

    let err = submissions::create_submission(
        &env.ctx,
        &student,
        assignment.id,
        SubmitRequest::default(),
        vec![],
    )
    .await
    .unwrap_err();
    assert_eq!(err.reason(), "missing_answer");

    let with_file = submissions::create_submission(
        &env.ctx,
        &student,
        assignment.id,
        SubmitRequest::default(),
        vec![UploadedFile::new("answer.pdf", vec![1, 2, 3])],
    )
    .await
    .unwrap();
    assert_eq!(with_file.files.len(), 1);
    assert!(env.media.contains(&with_file.files[0].ref_id));

    submissions::delete_submission(&env.ctx, &student, with_file.id)
        .await
        .unwrap();
    assert!(env.media.is_empty());
}

#[tokio::test]
async fn past_due_submission_is_late_and_frozen() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let student = env.user("student1", GlobalRole::Student).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;
    env.enroll(course.id, &student, EnrollmentRole::Student).await;
    let assignment = env
        .published_assignment(course.id, &teacher, in_hours(1), 10.0)
        .await;

    // 绕过服务层校验，把截止时间移到过去
    env.ctx
        .storage
        .update_assignment(
            assignment.id,
            UpdateAssignmentRequest {
                due_date: Some(chrono::Utc::now() - Duration::minutes(5)),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    let submission =
        submissions::create_submission(&env.ctx, &student, assignment.id, answer("late"), vec![])
            .await
            .unwrap();
    assert_eq!(submission.status, SubmissionStatus::Late);
    assert!(submission.is_late);

    let err = submissions::update_submission(&env.ctx, &student, submission.id, answer("x"), None)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "deadline_passed");

    // 过期作业不能重新发布
    assignments::toggle_assignment_publish(&env.ctx, &teacher, assignment.id)
        .await
        .unwrap();
    let err = assignments::toggle_assignment_publish(&env.ctx, &teacher, assignment.id)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "deadline_passed");
}

#[tokio::test]
async fn students_only_see_their_own_submissions() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let alice = env.user("alice01", GlobalRole::Student).await;
    let bob = env.user("bob0001", GlobalRole::Student).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;
    env.enroll(course.id, &alice, EnrollmentRole::Student).await;
    env.enroll(course.id, &bob, EnrollmentRole::Student).await;
    let assignment = env
        .published_assignment(course.id, &teacher, in_hours(1), 10.0)
        .await;

    let mine = submissions::create_submission(&env.ctx, &alice, assignment.id, answer("a"), vec![])
        .await
        .unwrap();

    let err = submissions::get_submission(&env.ctx, &bob, mine.id)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "not_owner");

    submissions::get_submission(&env.ctx, &teacher, mine.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn unpublished_assignment_rejects_submissions() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let student = env.user("student1", GlobalRole::Student).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;
    env.enroll(course.id, &student, EnrollmentRole::Student).await;
    let assignment = env
        .published_assignment(course.id, &teacher, in_hours(1), 10.0)
        .await;
    assignments::toggle_assignment_publish(&env.ctx, &teacher, assignment.id)
        .await
        .unwrap();

    let err =
        submissions::create_submission(&env.ctx, &student, assignment.id, answer("a"), vec![])
            .await
            .unwrap_err();
    assert_eq!(err.reason(), "not_published");
}

#[tokio::test]
async fn submission_status_enumerates_every_student() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;
    let mut students = Vec::new();
    for name in ["student1", "student2", "student3"] {
        let student = env.user(name, GlobalRole::Student).await;
        env.enroll(course.id, &student, EnrollmentRole::Student).await;
        students.push(student);
    }
    let assignment = env
        .published_assignment(course.id, &teacher, in_hours(1), 10.0)
        .await;
    submissions::create_submission(&env.ctx, &students[0], assignment.id, answer("a"), vec![])
        .await
        .unwrap();

    let rows = reports::submission_status(&env.ctx, &teacher, assignment.id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
    let missing: Vec<_> = rows
        .iter()
        .filter(|r| r.status == "not_submitted")
        .collect();
    assert_eq!(missing.len(), 2);
    assert!(missing.iter().all(|r| r.grade.is_none()));

    let summary = reports::assignment_summary(&env.ctx, &teacher, assignment.id)
        .await
        .unwrap();
    assert_eq!((summary.total, summary.submitted, summary.pending), (1, 1, 1));

    // 新提交后汇总不读到旧缓存
    submissions::create_submission(&env.ctx, &students[1], assignment.id, answer("b"), vec![])
        .await
        .unwrap();
    let summary = reports::assignment_summary(&env.ctx, &teacher, assignment.id)
        .await
        .unwrap();
    assert_eq!(summary.total, 2);

    let err = reports::submission_status(&env.ctx, &students[0], assignment.id)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "not_authorized");
}
