//! 层级可见性与授权
//!
//! `resolver::authorize` 是纯函数，调用方负责加载目标实体、祖先链以及
//! 当前用户在所属课程上的选课角色；`chain` 负责从存储中加载这些输入。

pub mod chain;
mod resolver;

pub use chain::Scope;
pub use resolver::{authorize, child_visible};

use serde::{Deserialize, Serialize};

use crate::models::{
    assignments::entities::Assignment, course_modules::entities::CourseModule,
    courses::entities::Course, departments::entities::Department, lessons::entities::Lesson,
    submissions::entities::Submission, users::entities::GlobalRole,
};

/// 已认证的请求方，单次请求内不可变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: i64,
    pub role: GlobalRole,
}

impl Actor {
    pub fn new(user_id: i64, role: GlobalRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == GlobalRole::Admin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Department,
    Course,
    Module,
    Lesson,
    Assignment,
    Submission,
    Enrollment,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Department => "department",
            EntityKind::Course => "course",
            EntityKind::Module => "module",
            EntityKind::Lesson => "lesson",
            EntityKind::Assignment => "assignment",
            EntityKind::Submission => "submission",
            EntityKind::Enrollment => "enrollment",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    /// 包括 active 开关
    Update,
    PublishToggle,
    Delete,
    Grade,
    Enroll,
}

/// 祖先链上的一环，只携带标志位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainLink {
    pub kind: EntityKind,
    pub id: i64,
    pub active: Option<bool>,
    pub published: Option<bool>,
}

impl ChainLink {
    pub fn department(d: &Department) -> Self {
        Self {
            kind: EntityKind::Department,
            id: d.id,
            active: Some(d.active),
            published: None,
        }
    }

    pub fn course(c: &Course) -> Self {
        Self {
            kind: EntityKind::Course,
            id: c.id,
            active: None,
            published: Some(c.published),
        }
    }

    pub fn module(m: &CourseModule) -> Self {
        Self {
            kind: EntityKind::Module,
            id: m.id,
            active: Some(m.active),
            published: None,
        }
    }

    pub fn assignment(a: &Assignment) -> Self {
        Self {
            kind: EntityKind::Assignment,
            id: a.id,
            active: Some(a.active),
            published: Some(a.published),
        }
    }
}

/// 授权目标。创建操作时描述的是待创建的实体（没有 id 与标志位）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub kind: EntityKind,
    pub id: Option<i64>,
    pub active: Option<bool>,
    pub published: Option<bool>,
    pub created_by: Option<i64>,
    pub owner_id: Option<i64>,
}

impl Target {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            id: None,
            active: None,
            published: None,
            created_by: None,
            owner_id: None,
        }
    }

    pub fn department(d: &Department) -> Self {
        Self {
            id: Some(d.id),
            active: Some(d.active),
            created_by: Some(d.created_by),
            ..Self::new(EntityKind::Department)
        }
    }

    pub fn course(c: &Course) -> Self {
        Self {
            id: Some(c.id),
            published: Some(c.published),
            created_by: Some(c.created_by),
            ..Self::new(EntityKind::Course)
        }
    }

    pub fn module(m: &CourseModule) -> Self {
        Self {
            id: Some(m.id),
            active: Some(m.active),
            created_by: Some(m.created_by),
            ..Self::new(EntityKind::Module)
        }
    }

    pub fn lesson(l: &Lesson) -> Self {
        Self {
            id: Some(l.id),
            active: Some(l.active),
            created_by: Some(l.created_by),
            ..Self::new(EntityKind::Lesson)
        }
    }

    pub fn assignment(a: &Assignment) -> Self {
        Self {
            id: Some(a.id),
            active: Some(a.active),
            published: Some(a.published),
            created_by: Some(a.created_by),
            ..Self::new(EntityKind::Assignment)
        }
    }

    pub fn submission(s: &Submission) -> Self {
        Self {
            id: Some(s.id),
            owner_id: Some(s.student_id),
            ..Self::new(EntityKind::Submission)
        }
    }
}

/// 拒绝原因，`code()` 为稳定的原因码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    AncestorInactive { kind: EntityKind, id: i64 },
    NotAssignedToCourse,
    NotEnrolled,
    NotPublished,
    NotAuthor,
    NotOwner,
    EntityInactive,
    NotAuthorized,
    DeadlinePassed,
    LastTeacher,
    MissingAnswer,
}

impl DenyReason {
    pub fn code(&self) -> &'static str {
        match self {
            DenyReason::AncestorInactive { .. } => "ancestor_inactive",
            DenyReason::NotAssignedToCourse => "not_assigned_to_course",
            DenyReason::NotEnrolled => "not_enrolled",
            DenyReason::NotPublished => "not_published",
            DenyReason::NotAuthor => "not_author",
            DenyReason::NotOwner => "not_owner",
            DenyReason::EntityInactive => "entity_inactive",
            DenyReason::NotAuthorized => "not_authorized",
            DenyReason::DeadlinePassed => "deadline_passed",
            DenyReason::LastTeacher => "last_teacher",
            DenyReason::MissingAnswer => "missing_answer",
        }
    }

    pub fn message(&self) -> String {
        match self {
            DenyReason::AncestorInactive { kind, id } => format!("{kind} {id} is inactive"),
            DenyReason::NotAssignedToCourse => "You are not a teacher of this course".into(),
            DenyReason::NotEnrolled => "You are not enrolled in this course".into(),
            DenyReason::NotPublished => "This content is not published yet".into(),
            DenyReason::NotAuthor => "Only the authoring teacher can do this".into(),
            DenyReason::NotOwner => "You can only access your own submission".into(),
            DenyReason::EntityInactive => "This content is inactive".into(),
            DenyReason::NotAuthorized => "You are not authorized to perform this action".into(),
            DenyReason::DeadlinePassed => "The deadline has passed".into(),
            DenyReason::LastTeacher => "Cannot remove the last teacher of the course".into(),
            DenyReason::MissingAnswer => "A text answer or at least one file is required".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> crate::errors::Result<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(reason.into()),
        }
    }
}
