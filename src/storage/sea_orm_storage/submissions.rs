//! 提交存储操作

use super::{SeaOrmStorage, db_err, fetch_page};
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    media::MediaRef,
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::MySubmissionListParams,
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建提交；同一学生同一作业已有有效提交时由唯一索引返回 Conflict
    pub async fn create_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        text_answer: Option<String>,
        files: Vec<MediaRef>,
        status: SubmissionStatus,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            assignment_id: Set(assignment_id),
            student_id: Set(student_id),
            text_answer: Set(text_answer),
            files: Set(MediaRef::list_to_json(&files)),
            status: Set(status.to_string()),
            is_late: Set(status == SubmissionStatus::Late),
            grade: Set(None),
            feedback: Set(None),
            graded_by: Set(None),
            graded_at: Set(None),
            submitted_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            live: Set(Some(true)),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_err("创建提交失败"))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询提交失败"))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 学生在作业下的有效提交
    pub async fn find_live_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Live.eq(true))
            .one(&self.db)
            .await
            .map_err(db_err("查询提交失败"))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 分页列出作业的有效提交
    pub async fn list_assignment_submissions_impl(
        &self,
        assignment_id: i64,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<Submission>> {
        let select = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::Live.eq(true))
            .order_by_asc(Column::SubmittedAt);

        fetch_page(&self.db, select, page, size, |m| m.into_submission()).await
    }

    /// 作业的全部有效提交（统计用）
    pub async fn list_live_submissions_impl(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        let rows = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::Live.eq(true))
            .all(&self.db)
            .await
            .map_err(db_err("查询作业提交失败"))?;

        Ok(rows.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 学生自己的有效提交，可按课程过滤
    pub async fn list_student_submissions_impl(
        &self,
        student_id: i64,
        params: MySubmissionListParams,
    ) -> Result<PaginatedResponse<Submission>> {
        let (page, size) = params.pagination.normalized();

        let mut select = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Live.eq(true));

        if let Some(course_id) = params.course_id {
            let assignment_ids: Vec<i64> = Assignments::find()
                .filter(AssignmentColumn::CourseId.eq(course_id))
                .all(&self.db)
                .await
                .map_err(db_err("查询课程作业失败"))?
                .into_iter()
                .map(|a| a.id)
                .collect();

            if assignment_ids.is_empty() {
                return Ok(PaginatedResponse {
                    items: vec![],
                    pagination: PaginationInfo::new(page, size, 0, 0),
                });
            }
            select = select.filter(Column::AssignmentId.is_in(assignment_ids));
        }

        select = select.order_by_desc(Column::SubmittedAt);

        fetch_page(&self.db, select, page, size, |m| m.into_submission()).await
    }

    /// 修改提交内容，files 为 Some 时整体替换
    ///
    /// 以状态为条件写入：并发评分或删除之后的修改不会生效
    pub async fn update_submission_content_impl(
        &self,
        id: i64,
        text_answer: Option<String>,
        files: Option<Vec<MediaRef>>,
        allow_graded: bool,
    ) -> Result<Option<Submission>> {
        let mut model = ActiveModel {
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(text_answer) = text_answer {
            model.text_answer = Set(Some(text_answer));
        }
        if let Some(files) = files {
            model.files = Set(MediaRef::list_to_json(&files));
        }

        let result = Submissions::update_many()
            .set(model)
            .filter(Column::Id.eq(id))
            .filter(Column::Status.is_in(writable_statuses(allow_graded)))
            .exec(&self.db)
            .await
            .map_err(db_err("更新提交失败"))?;

        if result.rows_affected == 0 {
            return self.status_conflict(id).await;
        }
        self.get_submission_by_id_impl(id).await
    }

    /// 评分；allow_regrade 为 false 时已评分的提交不会被覆盖
    pub async fn grade_submission_impl(
        &self,
        id: i64,
        grade: f64,
        feedback: Option<String>,
        graded_by: i64,
        allow_regrade: bool,
    ) -> Result<Option<Submission>> {
        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            status: Set(SubmissionStatus::Graded.to_string()),
            grade: Set(Some(grade)),
            feedback: Set(feedback),
            graded_by: Set(Some(graded_by)),
            graded_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = Submissions::update_many()
            .set(model)
            .filter(Column::Id.eq(id))
            .filter(Column::Status.is_in(writable_statuses(allow_regrade)))
            .exec(&self.db)
            .await
            .map_err(db_err("评分失败"))?;

        if result.rows_affected == 0 {
            return self.status_conflict(id).await;
        }
        self.get_submission_by_id_impl(id).await
    }

    /// 软删除：只允许 submitted / late，live 置空以释放唯一索引
    pub async fn soft_delete_submission_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Submissions::update_many()
            .col_expr(
                Column::Status,
                sea_orm::sea_query::Expr::value(SubmissionStatus::Deleted.to_string()),
            )
            .col_expr(Column::DeletedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(Column::Live, sea_orm::sea_query::Expr::value(Option::<bool>::None))
            .filter(Column::Id.eq(id))
            .filter(Column::Live.eq(true))
            .filter(Column::Status.is_in(writable_statuses(false)))
            .exec(&self.db)
            .await
            .map_err(db_err("删除提交失败"))?;

        if result.rows_affected == 0 {
            return Ok(self.status_conflict(id).await?.is_some());
        }
        Ok(true)
    }

    // 条件写入未命中：行不存在返回 None，否则按当前状态报错
    async fn status_conflict(&self, id: i64) -> Result<Option<Submission>> {
        let Some(current) = self.get_submission_by_id_impl(id).await? else {
            return Ok(None);
        };
        Err(match current.status {
            SubmissionStatus::Graded => {
                LmsError::state_with_reason("already_graded", "Submission has already been graded")
            }
            SubmissionStatus::Deleted => {
                LmsError::state_with_reason("submission_deleted", "Submission has been deleted")
            }
            SubmissionStatus::Submitted | SubmissionStatus::Late => LmsError::state_with_reason(
                "submission_changed",
                "Submission was modified concurrently",
            ),
        })
    }
}

// graded 是终态，只有管理员的写入可以越过
fn writable_statuses(allow_graded: bool) -> Vec<String> {
    let mut statuses = vec![
        SubmissionStatus::Submitted.to_string(),
        SubmissionStatus::Late.to_string(),
    ];
    if allow_graded {
        statuses.push(SubmissionStatus::Graded.to_string());
    }
    statuses
}
