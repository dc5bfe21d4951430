//! 课程存储操作

use super::{SeaOrmStorage, db_err, fetch_page};
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::entity::enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as Enrollments,
};
use crate::entity::modules::{Column as ModuleColumn, Entity as Modules};
use crate::errors::{LmsError, Result};
use crate::lifecycle::publish::PublishState;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    courses::{
        entities::Course,
        requests::{CourseQuery, CreateCourseRequest, UpdateCourseRequest},
    },
    enrollments::entities::EnrollmentRole,
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建课程，指定负责教师时同一事务内完成选课
    pub async fn create_course_impl(
        &self,
        req: CreateCourseRequest,
        created_by: i64,
        enrolled_by: i64,
    ) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let model = ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            course_code: Set(req.course_code),
            department_id: Set(req.department_id),
            created_by: Set(created_by),
            published: Set(false),
            published_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let course = model.insert(&txn).await.map_err(db_err("创建课程失败"))?;

        if let Some(teacher_id) = req.teacher_id {
            EnrollmentActiveModel {
                user_id: Set(teacher_id),
                course_id: Set(course.id),
                role: Set(EnrollmentRole::Teacher.to_string()),
                enrolled_by: Set(enrolled_by),
                enrolled_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_err("课程教师选课失败"))?;
        }

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        Ok(course.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询课程失败"))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseQuery,
    ) -> Result<PaginatedResponse<Course>> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        let mut select = Courses::find();

        // 仅限成员所在课程
        if let Some(member_id) = query.member_id {
            let course_ids: Vec<i64> = Enrollments::find()
                .filter(EnrollmentColumn::UserId.eq(member_id))
                .all(&self.db)
                .await
                .map_err(db_err("查询用户选课失败"))?
                .into_iter()
                .map(|e| e.course_id)
                .collect();

            if course_ids.is_empty() {
                return Ok(PaginatedResponse {
                    items: vec![],
                    pagination: PaginationInfo::new(page, size, 0, 0),
                });
            }
            select = select.filter(Column::Id.is_in(course_ids));
        }

        if query.published_only {
            select = select.filter(Column::Published.eq(true));
        }

        if query.active_departments_only {
            let inactive = self.list_inactive_department_ids_impl().await?;
            if !inactive.is_empty() {
                select = select.filter(Column::DepartmentId.is_not_in(inactive));
            }
        }

        if let Some(department_id) = query.department_id {
            select = select.filter(Column::DepartmentId.eq(department_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Title.like(contains_pattern(pattern)))
                    .add(Column::CourseCode.like(contains_pattern(pattern))),
            );
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        fetch_page(&self.db, select, page, size, |m| m.into_course()).await
    }

    /// 更新课程信息
    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(department_id) = update.department_id {
            model.department_id = Set(department_id);
        }

        let result = model.update(&self.db).await.map_err(db_err("更新课程失败"))?;

        Ok(Some(result.into_course()))
    }

    /// 写入发布状态
    pub async fn set_course_published_impl(
        &self,
        id: i64,
        state: PublishState,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            published: Set(state.published),
            published_at: Set(state.published_at.map(|t| t.timestamp())),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.update(&self.db).await.map_err(db_err("更新课程发布状态失败"))?;

        Ok(Some(result.into_course()))
    }

    /// 删除课程，仅允许删除没有单元和作业的课程
    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let modules = Modules::find()
            .filter(ModuleColumn::CourseId.eq(id))
            .count(&txn)
            .await
            .map_err(db_err("查询课程单元失败"))?;
        let assignments = Assignments::find()
            .filter(AssignmentColumn::CourseId.eq(id))
            .filter(AssignmentColumn::DeletedAt.is_null())
            .count(&txn)
            .await
            .map_err(db_err("查询课程作业失败"))?;

        if modules > 0 || assignments > 0 {
            return Err(LmsError::conflict_with_reason(
                "course_not_empty",
                format!("Course has {modules} modules and {assignments} assignments"),
            ));
        }

        let result = Courses::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err("删除课程失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        Ok(result.rows_affected > 0)
    }
}
