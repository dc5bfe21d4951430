//! 课程单元存储操作

use super::{SeaOrmStorage, db_err, fetch_page};
use crate::entity::lessons::{Column as LessonColumn, Entity as Lessons};
use crate::entity::modules::{ActiveModel, Column, Entity as Modules};
use crate::errors::Result;
use crate::media::MediaStore;
use crate::models::{
    PaginatedResponse,
    course_modules::{
        entities::CourseModule,
        requests::{CreateModuleRequest, UpdateModuleRequest},
    },
    media::MediaRef,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

impl SeaOrmStorage {
    /// 创建单元
    pub async fn create_module_impl(
        &self,
        course_id: i64,
        req: CreateModuleRequest,
        created_by: i64,
    ) -> Result<CourseModule> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            title: Set(req.title),
            description: Set(req.description),
            active: Set(true),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_err("创建单元失败"))?;

        Ok(result.into_module())
    }

    /// 通过 ID 获取单元
    pub async fn get_module_by_id_impl(&self, id: i64) -> Result<Option<CourseModule>> {
        let result = Modules::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询单元失败"))?;

        Ok(result.map(|m| m.into_module()))
    }

    /// 分页列出课程下的单元
    pub async fn list_modules_with_pagination_impl(
        &self,
        course_id: i64,
        active_only: bool,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<CourseModule>> {
        let mut select = Modules::find().filter(Column::CourseId.eq(course_id));
        if active_only {
            select = select.filter(Column::Active.eq(true));
        }
        select = select.order_by_asc(Column::CreatedAt).order_by_asc(Column::Id);

        fetch_page(&self.db, select, page, size, |m| m.into_module()).await
    }

    /// 更新单元信息
    pub async fn update_module_impl(
        &self,
        id: i64,
        update: UpdateModuleRequest,
    ) -> Result<Option<CourseModule>> {
        if self.get_module_by_id_impl(id).await?.is_none() {
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

        let result = model.update(&self.db).await.map_err(db_err("更新单元失败"))?;

        Ok(Some(result.into_module()))
    }

    pub async fn set_module_active_impl(
        &self,
        id: i64,
        active: bool,
    ) -> Result<Option<CourseModule>> {
        if self.get_module_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            active: Set(active),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.update(&self.db).await.map_err(db_err("更新单元状态失败"))?;

        Ok(Some(result.into_module()))
    }

    /// 级联删除单元
    ///
    /// 课时行与单元行在同一事务内删除；课时文件在提交前删除，
    /// 任一步失败时事务回滚，单元保持不变。
    ///
    /// 文件删除无法回滚：第 N 个文件删除失败时，前 N-1 个已经不存在，
    /// 回滚后保留下来的课时会引用这些缺失的文件。`MediaStore::delete` 对缺失文件返回成功，
    /// 再次删除单元即可完成级联。
    pub async fn delete_module_cascade_impl(&self, id: i64, media: &dyn MediaStore) -> Result<bool> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let lessons = Lessons::find()
            .filter(LessonColumn::ModuleId.eq(id))
            .all(&txn)
            .await
            .map_err(db_err("查询单元课时失败"))?;

        let files: Vec<MediaRef> = lessons
            .iter()
            .flat_map(|l| MediaRef::list_from_json(&l.files))
            .collect();

        Lessons::delete_many()
            .filter(LessonColumn::ModuleId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err("删除单元课时失败"))?;

        let result = Modules::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err("删除单元失败"))?;

        // 未提交的事务在 drop 时回滚
        for file in &files {
            media.delete(&file.ref_id).await?;
        }

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        info!(
            "Module {} deleted with {} lessons and {} files",
            id,
            lessons.len(),
            files.len()
        );
        Ok(result.rows_affected > 0)
    }
}
