//! 课时存储操作

use super::{SeaOrmStorage, db_err, fetch_page};
use crate::entity::lessons::{ActiveModel, Column, Entity as Lessons};
use crate::errors::Result;
use crate::media::{self, MediaStore};
use crate::models::{
    PaginatedResponse,
    course_modules::entities::CourseModule,
    lessons::{
        entities::Lesson,
        requests::{CreateLessonRequest, UpdateLessonRequest},
    },
    media::MediaRef,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建课时，序号为单元内现有课时数 + 1
    pub async fn create_lesson_impl(
        &self,
        module: &CourseModule,
        req: CreateLessonRequest,
        files: Vec<MediaRef>,
        created_by: i64,
    ) -> Result<Lesson> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let count = Lessons::find()
            .filter(Column::ModuleId.eq(module.id))
            .count(&txn)
            .await
            .map_err(db_err("查询课时数量失败"))?;

        let model = ActiveModel {
            module_id: Set(module.id),
            course_id: Set(module.course_id),
            title: Set(req.title),
            description: Set(req.description),
            text_content: Set(req.text_content),
            video_link: Set(req.video_link),
            files: Set(MediaRef::list_to_json(&files)),
            lesson_order: Set(count as i32 + 1),
            active: Set(true),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let lesson = model.insert(&txn).await.map_err(db_err("创建课时失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        Ok(lesson.into_lesson())
    }

    /// 通过 ID 获取课时
    pub async fn get_lesson_by_id_impl(&self, id: i64) -> Result<Option<Lesson>> {
        let result = Lessons::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询课时失败"))?;

        Ok(result.map(|m| m.into_lesson()))
    }

    /// 按序号分页列出单元下的课时
    pub async fn list_lessons_with_pagination_impl(
        &self,
        module_id: i64,
        active_only: bool,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<Lesson>> {
        let mut select = Lessons::find().filter(Column::ModuleId.eq(module_id));
        if active_only {
            select = select.filter(Column::Active.eq(true));
        }
        select = select.order_by_asc(Column::LessonOrder);

        fetch_page(&self.db, select, page, size, |m| m.into_lesson()).await
    }

    /// 更新课时，files 为 Some 时整体替换文件列表
    pub async fn update_lesson_impl(
        &self,
        id: i64,
        update: UpdateLessonRequest,
        files: Option<Vec<MediaRef>>,
    ) -> Result<Option<Lesson>> {
        if self.get_lesson_by_id_impl(id).await?.is_none() {
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
        if let Some(text_content) = update.text_content {
            model.text_content = Set(Some(text_content));
        }
        if let Some(video_link) = update.video_link {
            model.video_link = Set(Some(video_link));
        }
        if let Some(files) = files {
            model.files = Set(MediaRef::list_to_json(&files));
        }

        let result = model.update(&self.db).await.map_err(db_err("更新课时失败"))?;

        Ok(Some(result.into_lesson()))
    }

    pub async fn set_lesson_active_impl(&self, id: i64, active: bool) -> Result<Option<Lesson>> {
        if self.get_lesson_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            active: Set(active),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.update(&self.db).await.map_err(db_err("更新课时状态失败"))?;

        Ok(Some(result.into_lesson()))
    }

    /// 删除课时，并把同单元中序号更大的课时前移一位
    ///
    /// 文件在提交之后释放：释放失败只留下无引用的文件，不会出现引用已删除文件的课时。
    pub async fn delete_lesson_impl(&self, id: i64, store: &dyn MediaStore) -> Result<bool> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let Some(lesson) = Lessons::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err("查询课时失败"))?
        else {
            return Ok(false);
        };

        Lessons::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err("删除课时失败"))?;

        Lessons::update_many()
            .col_expr(Column::LessonOrder, Expr::cust("lesson_order - 1"))
            .filter(Column::ModuleId.eq(lesson.module_id))
            .filter(Column::LessonOrder.gt(lesson.lesson_order))
            .exec(&txn)
            .await
            .map_err(db_err("课时重新编号失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        media::release_all(store, &MediaRef::list_from_json(&lesson.files)).await;

        Ok(true)
    }
}
