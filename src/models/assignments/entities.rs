use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::media::MediaRef;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lms/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub module_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub max_marks: f64,
    pub attachments: Vec<MediaRef>,
    pub active: bool,
    pub published: bool,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
