use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::media::MediaRef;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lms/lesson.ts")]
pub struct Lesson {
    pub id: i64,
    pub module_id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub text_content: Option<String>,
    pub video_link: Option<String>,
    pub files: Vec<MediaRef>,
    pub order: i32,
    pub active: bool,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
