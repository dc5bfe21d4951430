//! 从存储加载目标实体及其祖先链
//!
//! 每个 `load_*` 返回实体本身和它作为授权目标时的 [`Scope`]；
//! 为它的子实体授权时使用 `scope.below(ChainLink::xxx(&entity))`。

use super::ChainLink;
use crate::errors::{LmsError, Result};
use crate::models::{
    assignments::entities::Assignment, course_modules::entities::CourseModule,
    courses::entities::Course, departments::entities::Department, lessons::entities::Lesson,
    submissions::entities::Submission,
};
use crate::storage::Storage;

/// 目标所在课程与祖先链（最近的父级在前）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub course_id: Option<i64>,
    pub chain: Vec<ChainLink>,
}

impl Scope {
    /// 院系本身没有祖先
    pub fn root() -> Self {
        Self::default()
    }

    /// 子实体的作用域：把父级插到链首
    pub fn below(&self, parent: ChainLink) -> Self {
        let mut chain = Vec::with_capacity(self.chain.len() + 1);
        chain.push(parent);
        chain.extend_from_slice(&self.chain);
        Self {
            course_id: match parent.kind {
                super::EntityKind::Course => Some(parent.id),
                _ => self.course_id,
            },
            chain,
        }
    }
}

pub async fn load_department(storage: &dyn Storage, id: i64) -> Result<(Department, Scope)> {
    let department = storage
        .get_department_by_id(id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("Department {id} not found")))?;
    Ok((department, Scope::root()))
}

pub async fn load_course(storage: &dyn Storage, id: i64) -> Result<(Course, Scope)> {
    let course = storage
        .get_course_by_id(id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("Course {id} not found")))?;
    let (department, root) = load_department(storage, course.department_id).await?;
    let mut scope = root.below(ChainLink::department(&department));
    scope.course_id = Some(course.id);
    Ok((course, scope))
}

pub async fn load_module(storage: &dyn Storage, id: i64) -> Result<(CourseModule, Scope)> {
    let module = storage
        .get_module_by_id(id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("Module {id} not found")))?;
    let (course, scope) = load_course(storage, module.course_id).await?;
    Ok((module, scope.below(ChainLink::course(&course))))
}

pub async fn load_lesson(storage: &dyn Storage, id: i64) -> Result<(Lesson, Scope)> {
    let lesson = storage
        .get_lesson_by_id(id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("Lesson {id} not found")))?;
    let (module, scope) = load_module(storage, lesson.module_id).await?;
    Ok((lesson, scope.below(ChainLink::module(&module))))
}

pub async fn load_assignment(storage: &dyn Storage, id: i64) -> Result<(Assignment, Scope)> {
    let assignment = storage
        .get_assignment_by_id(id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("Assignment {id} not found")))?;

    let scope = match assignment.module_id {
        Some(module_id) => {
            let (module, scope) = load_module(storage, module_id).await?;
            scope.below(ChainLink::module(&module))
        }
        None => {
            let (course, scope) = load_course(storage, assignment.course_id).await?;
            scope.below(ChainLink::course(&course))
        }
    };
    Ok((assignment, scope))
}

pub async fn load_submission(
    storage: &dyn Storage,
    id: i64,
) -> Result<(Submission, Assignment, Scope)> {
    let submission = storage
        .get_submission_by_id(id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("Submission {id} not found")))?;
    let (assignment, scope) = load_assignment(storage, submission.assignment_id).await?;
    let scope = scope.below(ChainLink::assignment(&assignment));
    Ok((submission, assignment, scope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::EntityKind;

    fn link(kind: EntityKind, id: i64) -> ChainLink {
        ChainLink {
            kind,
            id,
            active: Some(true),
            published: None,
        }
    }

    #[test]
    fn below_prepends_parent_and_tracks_course() {
        let dept_scope = Scope::root().below(link(EntityKind::Department, 1));
        assert_eq!(dept_scope.course_id, None);

        let module_scope = dept_scope.below(link(EntityKind::Course, 2));
        assert_eq!(module_scope.course_id, Some(2));

        let lesson_scope = module_scope.below(link(EntityKind::Module, 3));
        let kinds: Vec<_> = lesson_scope.chain.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![EntityKind::Module, EntityKind::Course, EntityKind::Department]
        );
        assert_eq!(lesson_scope.course_id, Some(2));
    }
}
