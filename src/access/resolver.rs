use super::{ChainLink, Decision, DenyReason, EntityKind, Operation, Target};
use crate::access::Actor;
use crate::models::{enrollments::entities::EnrollmentRole, users::entities::GlobalRole};

use EntityKind as K;
use Operation as Op;

/// 命中策略行之后还需满足的条件
#[derive(Debug, Clone, Copy)]
struct Requirement {
    /// 需要与全局角色对应的选课记录
    enrolled: bool,
    /// 目标必须由本人创建
    author: bool,
    /// 目标必须属于本人（提交）
    owner: bool,
    /// 链上全部已发布，且目标自身未停用
    visible: bool,
}

const OPEN: Requirement = Requirement {
    enrolled: false,
    author: false,
    owner: false,
    visible: false,
};
const MEMBER: Requirement = Requirement {
    enrolled: true,
    ..OPEN
};
const AUTHOR: Requirement = Requirement {
    author: true,
    ..MEMBER
};
const OWNER: Requirement = Requirement {
    owner: true,
    ..MEMBER
};
const VISIBLE: Requirement = Requirement {
    visible: true,
    ..MEMBER
};
const OWNER_VISIBLE: Requirement = Requirement {
    owner: true,
    visible: true,
    ..MEMBER
};

const ALL_KINDS: &[EntityKind] = &[
    K::Department,
    K::Course,
    K::Module,
    K::Lesson,
    K::Assignment,
    K::Submission,
    K::Enrollment,
];

type PolicyRow = (
    GlobalRole,
    &'static [EntityKind],
    &'static [Operation],
    Requirement,
);

/// 非管理员的授权表，按顺序匹配，第一条命中生效；未命中即 not_authorized
const POLICY: &[PolicyRow] = &[
    // 教务管理：全局可读、可管理选课，院系与课程的增改删
    (GlobalRole::Manager, ALL_KINDS, &[Op::Read, Op::Enroll], OPEN),
    (
        GlobalRole::Manager,
        &[K::Department, K::Course],
        &[Op::Create, Op::Update, Op::Delete],
        OPEN,
    ),
    // 教师
    (GlobalRole::Teacher, &[K::Department], &[Op::Read], OPEN),
    (
        GlobalRole::Teacher,
        &[K::Course],
        &[Op::Read, Op::Update],
        MEMBER,
    ),
    (GlobalRole::Teacher, &[K::Course], &[Op::PublishToggle], AUTHOR),
    (
        GlobalRole::Teacher,
        &[K::Module],
        &[Op::Create, Op::Read, Op::Update, Op::Delete],
        MEMBER,
    ),
    (
        GlobalRole::Teacher,
        &[K::Lesson, K::Assignment],
        &[Op::Create, Op::Read],
        MEMBER,
    ),
    (
        GlobalRole::Teacher,
        &[K::Lesson, K::Assignment],
        &[Op::Update, Op::PublishToggle, Op::Delete],
        AUTHOR,
    ),
    (
        GlobalRole::Teacher,
        &[K::Submission],
        &[Op::Read, Op::Grade],
        MEMBER,
    ),
    (GlobalRole::Teacher, &[K::Enrollment], &[Op::Read], MEMBER),
    // 学生
    (GlobalRole::Student, &[K::Department], &[Op::Read], OPEN),
    (
        GlobalRole::Student,
        &[K::Course, K::Module, K::Lesson, K::Assignment],
        &[Op::Read],
        VISIBLE,
    ),
    (GlobalRole::Student, &[K::Submission], &[Op::Create], VISIBLE),
    (
        GlobalRole::Student,
        &[K::Submission],
        &[Op::Read, Op::Delete],
        OWNER,
    ),
    (
        GlobalRole::Student,
        &[K::Submission],
        &[Op::Update],
        OWNER_VISIBLE,
    ),
];

fn lookup(role: GlobalRole, kind: EntityKind, op: Operation) -> Option<Requirement> {
    POLICY
        .iter()
        .find(|(r, kinds, ops, _)| *r == role && kinds.contains(&kind) && ops.contains(&op))
        .map(|(_, _, _, req)| *req)
}

/// 授权判定
///
/// `enrollment` 是 actor 在祖先链所属课程上的选课角色；`chain` 从最近的父级
/// 排到院系，不包含目标自身。规则自上而下，首条命中生效：
///
/// 1. admin 全部放行，忽略一切标志位
/// 2. 其他角色：链上第一个 `active == false` 的祖先 → `ancestor_inactive`
/// 3. 查授权表，未命中 → `not_authorized`
/// 4. 按命中行的条件依次检查选课、作者、所有者、可见性
pub fn authorize(
    actor: &Actor,
    enrollment: Option<EnrollmentRole>,
    op: Operation,
    target: &Target,
    chain: &[ChainLink],
) -> Decision {
    if actor.role == GlobalRole::Admin {
        return Decision::Allow;
    }

    if let Some(link) = chain.iter().find(|link| link.active == Some(false)) {
        return Decision::Deny(DenyReason::AncestorInactive {
            kind: link.kind,
            id: link.id,
        });
    }

    let Some(req) = lookup(actor.role, target.kind, op) else {
        return Decision::Deny(DenyReason::NotAuthorized);
    };

    if req.enrolled {
        let (expected, reason) = match actor.role {
            GlobalRole::Teacher => (EnrollmentRole::Teacher, DenyReason::NotAssignedToCourse),
            _ => (EnrollmentRole::Student, DenyReason::NotEnrolled),
        };
        if enrollment != Some(expected) {
            return Decision::Deny(reason);
        }
    }

    if req.author && target.created_by != Some(actor.user_id) {
        return Decision::Deny(DenyReason::NotAuthor);
    }

    if req.owner && target.owner_id.is_some() && target.owner_id != Some(actor.user_id) {
        return Decision::Deny(DenyReason::NotOwner);
    }

    if req.visible {
        let unpublished = chain
            .iter()
            .map(|link| link.published)
            .chain(std::iter::once(target.published))
            .any(|p| p == Some(false));
        if unpublished {
            return Decision::Deny(DenyReason::NotPublished);
        }
        if target.active == Some(false) {
            return Decision::Deny(DenyReason::EntityInactive);
        }
    }

    Decision::Allow
}

/// 列表中子项对该角色是否可见：学生只看到启用且已发布的内容
pub fn child_visible(role: GlobalRole, active: Option<bool>, published: Option<bool>) -> bool {
    match role {
        GlobalRole::Student => active != Some(false) && published != Some(false),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: Actor = Actor {
        user_id: 1,
        role: GlobalRole::Admin,
    };
    const MANAGER: Actor = Actor {
        user_id: 2,
        role: GlobalRole::Manager,
    };
    const TEACHER: Actor = Actor {
        user_id: 3,
        role: GlobalRole::Teacher,
    };
    const STUDENT: Actor = Actor {
        user_id: 4,
        role: GlobalRole::Student,
    };

    fn dept(active: bool) -> ChainLink {
        ChainLink {
            kind: K::Department,
            id: 10,
            active: Some(active),
            published: None,
        }
    }

    fn course(published: bool) -> ChainLink {
        ChainLink {
            kind: K::Course,
            id: 20,
            active: None,
            published: Some(published),
        }
    }

    fn module(active: bool) -> ChainLink {
        ChainLink {
            kind: K::Module,
            id: 30,
            active: Some(active),
            published: None,
        }
    }

    fn lesson(active: bool, created_by: i64) -> Target {
        Target {
            id: Some(40),
            active: Some(active),
            created_by: Some(created_by),
            ..Target::new(K::Lesson)
        }
    }

    fn assignment(published: bool, created_by: i64) -> Target {
        Target {
            id: Some(50),
            active: Some(true),
            published: Some(published),
            created_by: Some(created_by),
            ..Target::new(K::Assignment)
        }
    }

    fn lesson_chain() -> Vec<ChainLink> {
        vec![module(true), course(true), dept(true)]
    }

    fn denied(decision: Decision) -> &'static str {
        match decision {
            Decision::Allow => "allow",
            Decision::Deny(reason) => reason.code(),
        }
    }

    #[test]
    fn admin_bypasses_inactive_and_unpublished_chain() {
        let chain = vec![module(false), course(false), dept(false)];
        for op in [Op::Read, Op::Update, Op::Delete, Op::PublishToggle] {
            assert_eq!(
                authorize(&ADMIN, None, op, &lesson(false, 99), &chain),
                Decision::Allow
            );
        }
    }

    #[test]
    fn inactive_department_denies_enrolled_teacher() {
        let chain = vec![module(true), course(true), dept(false)];
        let decision = authorize(
            &TEACHER,
            Some(EnrollmentRole::Teacher),
            Op::Read,
            &lesson(true, TEACHER.user_id),
            &chain,
        );
        assert_eq!(
            decision,
            Decision::Deny(DenyReason::AncestorInactive {
                kind: K::Department,
                id: 10
            })
        );
    }

    #[test]
    fn nearest_inactive_ancestor_is_named() {
        let chain = vec![module(false), course(true), dept(false)];
        let decision = authorize(&MANAGER, None, Op::Read, &lesson(true, 3), &chain);
        assert_eq!(
            decision,
            Decision::Deny(DenyReason::AncestorInactive {
                kind: K::Module,
                id: 30
            })
        );
    }

    #[test]
    fn manager_reads_and_enrolls_without_enrollment() {
        let chain = vec![course(false), dept(true)];
        assert!(authorize(&MANAGER, None, Op::Read, &assignment(false, 3), &chain).is_allowed());
        assert!(
            authorize(
                &MANAGER,
                None,
                Op::Enroll,
                &Target::new(K::Enrollment),
                &chain
            )
            .is_allowed()
        );
        assert!(
            authorize(
                &MANAGER,
                None,
                Op::Create,
                &Target::new(K::Course),
                &[dept(true)]
            )
            .is_allowed()
        );
    }

    #[test]
    fn manager_cannot_touch_authored_content() {
        let chain = lesson_chain();
        for op in [Op::Update, Op::Delete, Op::PublishToggle] {
            assert_eq!(
                denied(authorize(&MANAGER, None, op, &lesson(true, 3), &chain)),
                "not_authorized"
            );
        }
        let sub = Target {
            id: Some(1),
            owner_id: Some(4),
            ..Target::new(K::Submission)
        };
        assert_eq!(
            denied(authorize(&MANAGER, None, Op::Grade, &sub, &chain)),
            "not_authorized"
        );
        assert_eq!(
            denied(authorize(
                &MANAGER,
                None,
                Op::PublishToggle,
                &Target::new(K::Course),
                &[dept(true)]
            )),
            "not_authorized"
        );
    }

    #[test]
    fn teacher_without_enrollment_is_not_assigned() {
        let chain = lesson_chain();
        assert_eq!(
            denied(authorize(&TEACHER, None, Op::Read, &lesson(true, 3), &chain)),
            "not_assigned_to_course"
        );
        // 学生身份的选课不能替代教师身份
        assert_eq!(
            denied(authorize(
                &TEACHER,
                Some(EnrollmentRole::Student),
                Op::Read,
                &lesson(true, 3),
                &chain
            )),
            "not_assigned_to_course"
        );
    }

    #[test]
    fn co_teacher_may_create_but_only_author_mutates() {
        let chain = lesson_chain();
        let enrolled = Some(EnrollmentRole::Teacher);
        assert!(
            authorize(
                &TEACHER,
                enrolled,
                Op::Create,
                &Target::new(K::Lesson),
                &chain
            )
            .is_allowed()
        );
        assert!(authorize(&TEACHER, enrolled, Op::Update, &lesson(true, 3), &chain).is_allowed());
        assert_eq!(
            denied(authorize(
                &TEACHER,
                enrolled,
                Op::Delete,
                &lesson(true, 77),
                &chain
            )),
            "not_author"
        );
        assert_eq!(
            denied(authorize(
                &TEACHER,
                enrolled,
                Op::PublishToggle,
                &assignment(false, 77),
                &chain[1..]
            )),
            "not_author"
        );
    }

    #[test]
    fn teacher_cannot_create_courses_or_enroll() {
        assert_eq!(
            denied(authorize(
                &TEACHER,
                None,
                Op::Create,
                &Target::new(K::Course),
                &[dept(true)]
            )),
            "not_authorized"
        );
        assert_eq!(
            denied(authorize(
                &TEACHER,
                Some(EnrollmentRole::Teacher),
                Op::Enroll,
                &Target::new(K::Enrollment),
                &[course(true), dept(true)]
            )),
            "not_authorized"
        );
    }

    #[test]
    fn student_needs_enrollment_and_published_chain() {
        let enrolled = Some(EnrollmentRole::Student);
        let published_chain = vec![course(true), dept(true)];
        assert_eq!(
            denied(authorize(
                &STUDENT,
                None,
                Op::Read,
                &assignment(true, 3),
                &published_chain
            )),
            "not_enrolled"
        );
        assert!(
            authorize(
                &STUDENT,
                enrolled,
                Op::Read,
                &assignment(true, 3),
                &published_chain
            )
            .is_allowed()
        );
        assert_eq!(
            denied(authorize(
                &STUDENT,
                enrolled,
                Op::Read,
                &assignment(false, 3),
                &published_chain
            )),
            "not_published"
        );
        assert_eq!(
            denied(authorize(
                &STUDENT,
                enrolled,
                Op::Read,
                &assignment(true, 3),
                &[course(false), dept(true)]
            )),
            "not_published"
        );
        assert_eq!(
            denied(authorize(
                &STUDENT,
                enrolled,
                Op::Read,
                &lesson(false, 3),
                &lesson_chain()
            )),
            "entity_inactive"
        );
    }

    #[test]
    fn student_only_mutates_own_submission() {
        let enrolled = Some(EnrollmentRole::Student);
        let chain = vec![
            ChainLink {
                kind: K::Assignment,
                id: 50,
                active: Some(true),
                published: Some(true),
            },
            course(true),
            dept(true),
        ];
        let own = Target {
            id: Some(1),
            owner_id: Some(STUDENT.user_id),
            ..Target::new(K::Submission)
        };
        let other = Target {
            owner_id: Some(999),
            ..own
        };
        assert!(
            authorize(
                &STUDENT,
                enrolled,
                Op::Create,
                &Target::new(K::Submission),
                &chain
            )
            .is_allowed()
        );
        assert!(authorize(&STUDENT, enrolled, Op::Update, &own, &chain).is_allowed());
        assert!(authorize(&STUDENT, enrolled, Op::Delete, &own, &chain).is_allowed());
        assert_eq!(
            denied(authorize(&STUDENT, enrolled, Op::Update, &other, &chain)),
            "not_owner"
        );
        assert_eq!(
            denied(authorize(&STUDENT, enrolled, Op::Grade, &own, &chain)),
            "not_authorized"
        );
        assert_eq!(
            denied(authorize(
                &STUDENT,
                enrolled,
                Op::Update,
                &lesson(true, 3),
                &lesson_chain()
            )),
            "not_authorized"
        );
    }

    #[test]
    fn unpublished_assignment_blocks_submission_create() {
        let chain = vec![
            ChainLink {
                kind: K::Assignment,
                id: 50,
                active: Some(true),
                published: Some(false),
            },
            course(true),
            dept(true),
        ];
        assert_eq!(
            denied(authorize(
                &STUDENT,
                Some(EnrollmentRole::Student),
                Op::Create,
                &Target::new(K::Submission),
                &chain
            )),
            "not_published"
        );
    }

    #[test]
    fn authorize_is_deterministic() {
        let chain = lesson_chain();
        let actors = [ADMIN, MANAGER, TEACHER, STUDENT];
        let ops = [
            Op::Create,
            Op::Read,
            Op::Update,
            Op::PublishToggle,
            Op::Delete,
            Op::Grade,
            Op::Enroll,
        ];
        let enrollments = [
            None,
            Some(EnrollmentRole::Teacher),
            Some(EnrollmentRole::Student),
        ];
        for actor in &actors {
            for op in ops {
                for enrollment in enrollments {
                    let first = authorize(actor, enrollment, op, &lesson(true, 3), &chain);
                    let second = authorize(actor, enrollment, op, &lesson(true, 3), &chain);
                    assert_eq!(first, second);
                }
            }
        }
    }

    #[test]
    fn students_see_only_active_published_children() {
        assert!(child_visible(GlobalRole::Student, Some(true), None));
        assert!(!child_visible(GlobalRole::Student, Some(false), None));
        assert!(!child_visible(GlobalRole::Student, Some(true), Some(false)));
        assert!(child_visible(GlobalRole::Teacher, Some(false), Some(false)));
        assert!(child_visible(GlobalRole::Manager, Some(false), None));
    }
}
