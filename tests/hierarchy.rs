mod common;

use common::{in_hours, setup};
use rust_lms_next::models::{
    PaginationQuery,
    assignments::requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    courses::requests::CourseListParams, enrollments::entities::EnrollmentRole,
    lessons::requests::UpdateLessonRequest, users::entities::GlobalRole,
};
use rust_lms_next::access::Actor;
use rust_lms_next::media::UploadedFile;
use rust_lms_next::services::{
    LmsContext, assignments, courses, departments, enrollments, lessons, modules,
};

#[tokio::test]
async fn inactive_department_hides_lessons_from_enrolled_teacher() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;
    let module = env.module(course.id, &teacher).await;
    env.lesson(module.id, &teacher, "Intro", 0).await;

    let page = lessons::list_lessons(&env.ctx, &teacher, module.id, PaginationQuery::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);

    departments::set_department_active(&env.ctx, &env.admin, dept.id, false)
        .await
        .unwrap();

    let err = lessons::list_lessons(&env.ctx, &teacher, module.id, PaginationQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "ancestor_inactive");

    // 管理员忽略祖先状态
    let page = lessons::list_lessons(&env.ctx, &env.admin, module.id, PaginationQuery::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn inactive_department_drops_out_of_course_lists() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let student = env.user("student1", GlobalRole::Student).await;
    let manager = env.user("manager1", GlobalRole::Manager).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;
    env.enroll(course.id, &student, EnrollmentRole::Student).await;

    let page = courses::list_courses(&env.ctx, &teacher, CourseListParams::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    let mine = enrollments::list_my_enrollments(&env.ctx, &student)
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);

    departments::set_department_active(&env.ctx, &env.admin, dept.id, false)
        .await
        .unwrap();

    let page = courses::list_courses(&env.ctx, &teacher, CourseListParams::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());
    let page = courses::list_my_courses(&env.ctx, &teacher, PaginationQuery::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());
    let page = courses::list_courses(&env.ctx, &manager, CourseListParams::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());
    let mine = enrollments::list_my_enrollments(&env.ctx, &student)
        .await
        .unwrap();
    assert!(mine.is_empty());

    let page = courses::list_courses(&env.ctx, &env.admin, CourseListParams::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, course.id);
}

#[tokio::test]
async fn inactive_module_hides_its_assignments_from_lists() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let student = env.user("student1", GlobalRole::Student).await;
    let dept = env.department("CS").await;
    let course = env.published_course(dept.id, "CS101", &teacher).await;
    env.enroll(course.id, &student, EnrollmentRole::Student).await;
    let module = env.module(course.id, &teacher).await;

    let in_module = assignments::create_assignment(
        &env.ctx,
        &teacher,
        course.id,
        CreateAssignmentRequest {
            title: "Lab 1".into(),
            description: None,
            module_id: Some(module.id),
            due_date: in_hours(24),
            max_marks: 10.0,
        },
        vec![],
    )
    .await
    .unwrap();
    assignments::toggle_assignment_publish(&env.ctx, &teacher, in_module.id)
        .await
        .unwrap();
    let course_level = env
        .published_assignment(course.id, &teacher, in_hours(48), 100.0)
        .await;

    let page =
        assignments::list_assignments(&env.ctx, &student, course.id, PaginationQuery::default())
            .await
            .unwrap();
    assert_eq!(page.items.len(), 2);

    modules::set_module_active(&env.ctx, &teacher, module.id, false)
        .await
        .unwrap();

    let err = assignments::get_assignment(&env.ctx, &student, in_module.id)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "ancestor_inactive");

    for actor in [&student, &teacher] {
        let page =
            assignments::list_assignments(&env.ctx, actor, course.id, PaginationQuery::default())
                .await
                .unwrap();
        let ids: Vec<i64> = page.items.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![course_level.id]);
    }

    let page =
        assignments::list_assignments(&env.ctx, &env.admin, course.id, PaginationQuery::default())
            .await
            .unwrap();
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn manager_does_not_bypass_inactive_department() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let manager = env.user("manager1", GlobalRole::Manager).await;
    let dept = env.department("MATH").await;
    let course = env.published_course(dept.id, "MA101", &teacher).await;

    departments::set_department_active(&env.ctx, &env.admin, dept.id, false)
        .await
        .unwrap();
    let err = courses::get_course(&env.ctx, &manager, course.id)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "ancestor_inactive");
}

#[tokio::test]
async fn student_cannot_read_unpublished_course_content() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let student = env.user("student1", GlobalRole::Student).await;
    let dept = env.department("BIO").await;
    let course = env.published_course(dept.id, "BI101", &teacher).await;
    env.enroll(course.id, &student, EnrollmentRole::Student).await;
    let module = env.module(course.id, &teacher).await;

    lessons::list_lessons(&env.ctx, &student, module.id, PaginationQuery::default())
        .await
        .unwrap();

    courses::toggle_course_publish(&env.ctx, &env.admin, course.id)
        .await
        .unwrap();
    let err = lessons::list_lessons(&env.ctx, &student, module.id, PaginationQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "not_published");
}

#[tokio::test]
async fn publish_round_trip_resets_published_at() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let dept = env.department("ART").await;
    let course = env.published_course(dept.id, "AR101", &teacher).await;
    assert!(course.published);
    assert!(course.published_at.is_some());

    let hidden = courses::toggle_course_publish(&env.ctx, &teacher, course.id)
        .await
        .unwrap();
    assert!(!hidden.published);
    assert!(hidden.published_at.is_none());

    let shown = courses::toggle_course_publish(&env.ctx, &teacher, course.id)
        .await
        .unwrap();
    assert!(shown.published);
    assert!(shown.published_at.is_some());
}

#[tokio::test]
async fn module_delete_cascades_lessons_and_files() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let dept = env.department("PHY").await;
    let course = env.published_course(dept.id, "PH101", &teacher).await;
    let module = env.module(course.id, &teacher).await;
    let first = env.lesson(module.id, &teacher, "Forces", 2).await;
    let second = env.lesson(module.id, &teacher, "Energy", 1).await;
    assert_eq!(env.media.len(), 3);

    modules::delete_module(&env.ctx, &teacher, module.id)
        .await
        .unwrap();

    assert!(env.media.is_empty());
    for id in [first.id, second.id] {
        let err = lessons::get_lesson(&env.ctx, &env.admin, id).await.unwrap_err();
        assert_eq!(err.reason(), "not_found");
    }
    let err = modules::get_module(&env.ctx, &env.admin, module.id)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "not_found");
}

#[tokio::test]
async fn module_delete_rolls_back_when_media_release_fails() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let dept = env.department("CHEM").await;
    let course = env.published_course(dept.id, "CH101", &teacher).await;
    let module = env.module(course.id, &teacher).await;
    let lesson = env.lesson(module.id, &teacher, "Atoms", 1).await;

    env.media.set_fail_deletes(true);
    assert!(
        modules::delete_module(&env.ctx, &teacher, module.id)
            .await
            .is_err()
    );

    modules::get_module(&env.ctx, &env.admin, module.id)
        .await
        .unwrap();
    let kept = lessons::get_lesson(&env.ctx, &env.admin, lesson.id)
        .await
        .unwrap();
    assert_eq!(kept.files.len(), 1);

    // 删除对缺失文件幂等，重试完成级联
    env.media.set_fail_deletes(false);
    modules::delete_module(&env.ctx, &teacher, module.id)
        .await
        .unwrap();
    assert!(env.media.is_empty());
}

#[tokio::test]
async fn lesson_delete_commits_before_releasing_media() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let dept = env.department("PHYS").await;
    let course = env.published_course(dept.id, "PH101", &teacher).await;
    let module = env.module(course.id, &teacher).await;
    let lesson = env.lesson(module.id, &teacher, "Optics", 1).await;
    let ref_id = lesson.files[0].ref_id.clone();

    env.media.set_fail_deletes(true);
    lessons::delete_lesson(&env.ctx, &teacher, lesson.id)
        .await
        .unwrap();

    let err = lessons::get_lesson(&env.ctx, &env.admin, lesson.id)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "not_found");
    // 释放失败只留下无引用的文件
    assert!(env.media.contains(&ref_id));
}

#[tokio::test]
async fn deleting_a_lesson_renumbers_the_rest() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let dept = env.department("HIST").await;
    let course = env.published_course(dept.id, "HI101", &teacher).await;
    let module = env.module(course.id, &teacher).await;
    let a = env.lesson(module.id, &teacher, "A", 0).await;
    let b = env.lesson(module.id, &teacher, "B", 0).await;
    let c = env.lesson(module.id, &teacher, "C", 0).await;
    assert_eq!((a.order, b.order, c.order), (1, 2, 3));

    lessons::delete_lesson(&env.ctx, &teacher, a.id).await.unwrap();

    let page = lessons::list_lessons(&env.ctx, &teacher, module.id, PaginationQuery::default())
        .await
        .unwrap();
    let orders: Vec<_> = page.items.iter().map(|l| (l.title.as_str(), l.order)).collect();
    assert_eq!(orders, vec![("B", 1), ("C", 2)]);

    // 新课时排在末尾
    let d = env.lesson(module.id, &teacher, "D", 0).await;
    assert_eq!(d.order, 3);
}

#[tokio::test]
async fn lesson_update_replaces_files_and_releases_old_ones() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let dept = env.department("GEO").await;
    let course = env.published_course(dept.id, "GE101", &teacher).await;
    let module = env.module(course.id, &teacher).await;
    let lesson = env.lesson(module.id, &teacher, "Maps", 2).await;
    let old_refs: Vec<_> = lesson.files.iter().map(|f| f.ref_id.clone()).collect();

    let updated = lessons::update_lesson(
        &env.ctx,
        &teacher,
        lesson.id,
        UpdateLessonRequest::default(),
        Some(vec![UploadedFile::new("new.pdf", vec![9])]),
    )
    .await
    .unwrap();

    assert_eq!(updated.files.len(), 1);
    assert!(old_refs.iter().all(|r| !env.media.contains(r)));
    assert!(env.media.contains(&updated.files[0].ref_id));
}

#[tokio::test]
async fn lesson_requires_text_or_video() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let dept = env.department("LIT").await;
    let course = env.published_course(dept.id, "LI101", &teacher).await;
    let module = env.module(course.id, &teacher).await;

    let err = lessons::create_lesson(
        &env.ctx,
        &teacher,
        module.id,
        rust_lms_next::models::lessons::requests::CreateLessonRequest {
            title: "Empty".into(),
            ..Default::default()
        },
        vec![],
    )
    .await
    .unwrap_err();
    assert_eq!(err.reason(), "missing_content");
}

#[tokio::test]
async fn other_teacher_cannot_edit_assignment() {
    let env = setup().await;
    let author = env.user("teacher1", GlobalRole::Teacher).await;
    let colleague = env.user("teacher2", GlobalRole::Teacher).await;
    let dept = env.department("ECO").await;
    let course = env.published_course(dept.id, "EC101", &author).await;
    env.enroll(course.id, &colleague, EnrollmentRole::Teacher).await;
    let assignment = env
        .published_assignment(course.id, &author, in_hours(24), 100.0)
        .await;

    let err = assignments::toggle_assignment_publish(&env.ctx, &colleague, assignment.id)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "not_author");

    // 未选课的教师连读取都不允许
    let outsider = env.user("teacher3", GlobalRole::Teacher).await;
    let err = assignments::get_assignment(&env.ctx, &outsider, assignment.id)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "not_assigned_to_course");
}

#[tokio::test]
async fn course_list_cache_sees_new_enrollment() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let student = env.user("student1", GlobalRole::Student).await;
    let dept = env.department("MUS").await;
    let course = env.published_course(dept.id, "MU101", &teacher).await;

    let before = courses::list_my_courses(&env.ctx, &student, PaginationQuery::default())
        .await
        .unwrap();
    assert!(before.items.is_empty());

    env.enroll(course.id, &student, EnrollmentRole::Student).await;

    let after = courses::list_my_courses(&env.ctx, &student, PaginationQuery::default())
        .await
        .unwrap();
    assert_eq!(after.items.len(), 1);
    assert_eq!(after.items[0].id, course.id);
}

async fn assignment_titles(ctx: &LmsContext, actor: &Actor, course_id: i64) -> Vec<String> {
    assignments::list_assignments(ctx, actor, course_id, PaginationQuery::default())
        .await
        .unwrap()
        .items
        .into_iter()
        .map(|a| a.title)
        .collect()
}

#[tokio::test]
async fn disabled_cache_reads_through_to_storage() {
    let env = setup().await;
    let teacher = env.user("teacher1", GlobalRole::Teacher).await;
    let dept = env.department("ART").await;
    let course = env.published_course(dept.id, "AR101", &teacher).await;
    let assignment = env
        .published_assignment(course.id, &teacher, in_hours(24), 10.0)
        .await;

    // 缓存开启时，绕过服务层的写入在失效前不可见
    assert_eq!(
        assignment_titles(&env.ctx, &env.admin, course.id).await,
        vec!["Essay"]
    );
    env.ctx
        .storage
        .update_assignment(
            assignment.id,
            UpdateAssignmentRequest {
                title: Some("Poster".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(
        assignment_titles(&env.ctx, &env.admin, course.id).await,
        vec!["Essay"]
    );

    let uncached = env.ctx.clone().with_cache_enabled(false);
    assert_eq!(
        assignment_titles(&uncached, &env.admin, course.id).await,
        vec!["Poster"]
    );
}
