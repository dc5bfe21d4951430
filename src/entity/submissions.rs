//! 提交实体
//!
//! `live` 在未删除时为 true，删除后置为 NULL；
//! (assignment_id, student_id, live) 唯一索引保证每个学生只有一份有效提交。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub text_answer: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub files: String,
    pub status: String,
    pub is_late: bool,
    #[sea_orm(column_type = "Double", nullable)]
    pub grade: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<i64>,
    pub submitted_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
    pub live: Option<bool>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::Submission {
        use crate::models::{
            media::MediaRef,
            submissions::entities::{Submission, SubmissionStatus},
        };

        Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            text_answer: self.text_answer,
            files: MediaRef::list_from_json(&self.files),
            status: self.status.parse().unwrap_or(SubmissionStatus::Submitted),
            is_late: self.is_late,
            grade: self.grade,
            feedback: self.feedback,
            graded_by: self.graded_by,
            graded_at: super::ts_opt(self.graded_at),
            submitted_at: super::ts(self.submitted_at),
            updated_at: super::ts(self.updated_at),
            deleted_at: super::ts_opt(self.deleted_at),
        }
    }
}
