//! 用户存储操作

use super::{SeaOrmStorage, db_err, fetch_page};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse,
    users::{
        entities::User,
        requests::{CreateUserRequest, UserListParams},
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            display_name: Set(req.display_name),
            role: Set(req.role.to_string()),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_err("创建用户失败"))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询用户失败"))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(db_err("查询用户总数失败"))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        params: UserListParams,
    ) -> Result<PaginatedResponse<User>> {
        let (page, size) = params.pagination.normalized();

        let mut select = Users::find();

        if let Some(role) = params.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(ref search) = params.search
            && !search.trim().is_empty()
        {
            let pattern = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Username.like(contains_pattern(pattern)))
                    .add(Column::Email.like(contains_pattern(pattern)))
                    .add(Column::DisplayName.like(contains_pattern(pattern))),
            );
        }

        select = select.order_by_asc(Column::Id);

        fetch_page(&self.db, select, page, size, |m| m.into_user()).await
    }

    /// 启用或停用用户
    pub async fn set_user_active_impl(&self, id: i64, active: bool) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            active: Set(active),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.update(&self.db).await.map_err(db_err("更新用户失败"))?;

        Ok(Some(result.into_user()))
    }
}
