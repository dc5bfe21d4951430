//! 作业存储操作

use super::{SeaOrmStorage, db_err, fetch_page};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::modules::{Column as ModuleColumn, Entity as Modules};
use crate::errors::Result;
use crate::lifecycle::publish::PublishState;
use crate::models::{
    PaginatedResponse,
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    media::MediaRef,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建作业（草稿状态）
    pub async fn create_assignment_impl(
        &self,
        course_id: i64,
        req: CreateAssignmentRequest,
        attachments: Vec<MediaRef>,
        created_by: i64,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            module_id: Set(req.module_id),
            title: Set(req.title),
            description: Set(req.description),
            due_date: Set(req.due_date.timestamp()),
            max_marks: Set(req.max_marks),
            attachments: Set(MediaRef::list_to_json(&attachments)),
            active: Set(true),
            published: Set(false),
            published_at: Set(None),
            deleted_at: Set(None),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_err("创建作业失败"))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业（包括已软删除的）
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询作业失败"))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 分页列出课程作业，不含已删除
    ///
    /// visible_only 时只含启用且已发布的；active_modules_only 时排除挂在停用单元下的作业，
    /// 不属于任何单元的作业不受影响。
    pub async fn list_assignments_with_pagination_impl(
        &self,
        course_id: i64,
        visible_only: bool,
        active_modules_only: bool,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<Assignment>> {
        let mut select = Assignments::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::DeletedAt.is_null());
        if visible_only {
            select = select
                .filter(Column::Active.eq(true))
                .filter(Column::Published.eq(true));
        }
        if active_modules_only {
            let inactive: Vec<i64> = Modules::find()
                .filter(ModuleColumn::CourseId.eq(course_id))
                .filter(ModuleColumn::Active.eq(false))
                .all(&self.db)
                .await
                .map_err(db_err("查询停用单元失败"))?
                .into_iter()
                .map(|m| m.id)
                .collect();
            if !inactive.is_empty() {
                select = select.filter(
                    Condition::any()
                        .add(Column::ModuleId.is_null())
                        .add(Column::ModuleId.is_not_in(inactive)),
                );
            }
        }
        select = select.order_by_asc(Column::DueDate).order_by_asc(Column::Id);

        fetch_page(&self.db, select, page, size, |m| m.into_assignment()).await
    }

    /// 更新作业，attachments 为 Some 时整体替换附件
    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
        attachments: Option<Vec<MediaRef>>,
    ) -> Result<Option<Assignment>> {
        if self.get_assignment_by_id_impl(id).await?.is_none() {
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
        if let Some(due_date) = update.due_date {
            model.due_date = Set(due_date.timestamp());
        }
        if let Some(max_marks) = update.max_marks {
            model.max_marks = Set(max_marks);
        }
        if let Some(attachments) = attachments {
            model.attachments = Set(MediaRef::list_to_json(&attachments));
        }

        let result = model.update(&self.db).await.map_err(db_err("更新作业失败"))?;

        Ok(Some(result.into_assignment()))
    }

    pub async fn set_assignment_published_impl(
        &self,
        id: i64,
        state: PublishState,
    ) -> Result<Option<Assignment>> {
        if self.get_assignment_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            published: Set(state.published),
            published_at: Set(state.published_at.map(|t| t.timestamp())),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.update(&self.db).await.map_err(db_err("更新作业发布状态失败"))?;

        Ok(Some(result.into_assignment()))
    }

    /// 软删除：停用并记录删除时间
    pub async fn soft_delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Assignments::update_many()
            .col_expr(Column::Active, sea_orm::sea_query::Expr::value(false))
            .col_expr(Column::DeletedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err("删除作业失败"))?;

        Ok(result.rows_affected > 0)
    }
}
