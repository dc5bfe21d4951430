//! 院系存储操作

use super::{SeaOrmStorage, db_err, fetch_page};
use crate::entity::departments::{ActiveModel, Column, Entity as Departments};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse,
    departments::{
        entities::Department,
        requests::{CreateDepartmentRequest, DepartmentListParams, UpdateDepartmentRequest},
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建院系
    pub async fn create_department_impl(
        &self,
        req: CreateDepartmentRequest,
        created_by: i64,
    ) -> Result<Department> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            code: Set(req.code),
            description: Set(req.description),
            active: Set(true),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_err("创建院系失败"))?;

        Ok(result.into_department())
    }

    /// 通过 ID 获取院系
    pub async fn get_department_by_id_impl(&self, id: i64) -> Result<Option<Department>> {
        let result = Departments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询院系失败"))?;

        Ok(result.map(|m| m.into_department()))
    }

    /// 分页列出院系
    pub async fn list_departments_with_pagination_impl(
        &self,
        params: DepartmentListParams,
        active_only: bool,
    ) -> Result<PaginatedResponse<Department>> {
        let (page, size) = params.pagination.normalized();

        let mut select = Departments::find();

        if active_only {
            select = select.filter(Column::Active.eq(true));
        }

        if let Some(ref search) = params.search
            && !search.trim().is_empty()
        {
            let pattern = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(contains_pattern(pattern)))
                    .add(Column::Code.like(contains_pattern(pattern))),
            );
        }

        select = select.order_by_asc(Column::Name);

        fetch_page(&self.db, select, page, size, |m| m.into_department()).await
    }

    /// 更新院系信息
    pub async fn update_department_impl(
        &self,
        id: i64,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>> {
        if self.get_department_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        let result = model.update(&self.db).await.map_err(db_err("更新院系失败"))?;

        Ok(Some(result.into_department()))
    }

    /// 启用或停用院系（软删除）
    pub async fn set_department_active_impl(
        &self,
        id: i64,
        active: bool,
    ) -> Result<Option<Department>> {
        if self.get_department_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            active: Set(active),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.update(&self.db).await.map_err(db_err("更新院系状态失败"))?;

        Ok(Some(result.into_department()))
    }

    /// 已停用院系的 ID，列表查询据此排除其下的课程
    pub async fn list_inactive_department_ids_impl(&self) -> Result<Vec<i64>> {
        let rows = Departments::find()
            .filter(Column::Active.eq(false))
            .all(&self.db)
            .await
            .map_err(db_err("查询停用院系失败"))?;

        Ok(rows.into_iter().map(|d| d.id).collect())
    }
}
