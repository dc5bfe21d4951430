//! 作业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub module_id: Option<i64>,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub due_date: i64,
    #[sea_orm(column_type = "Double")]
    pub max_marks: f64,
    #[sea_orm(column_type = "Text")]
    pub attachments: String,
    pub active: bool,
    pub published: bool,
    pub published_at: Option<i64>,
    pub deleted_at: Option<i64>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_assignment(self) -> crate::models::assignments::entities::Assignment {
        use crate::models::{assignments::entities::Assignment, media::MediaRef};

        Assignment {
            id: self.id,
            course_id: self.course_id,
            module_id: self.module_id,
            title: self.title,
            description: self.description,
            due_date: super::ts(self.due_date),
            max_marks: self.max_marks,
            attachments: MediaRef::list_from_json(&self.attachments),
            active: self.active,
            published: self.published,
            published_at: super::ts_opt(self.published_at),
            deleted_at: super::ts_opt(self.deleted_at),
            created_by: self.created_by,
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
        }
    }
}
