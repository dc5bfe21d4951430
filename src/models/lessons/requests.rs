use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "lms/lesson.ts")]
pub struct CreateLessonRequest {
    pub title: String,
    pub description: Option<String>,
    pub text_content: Option<String>,
    pub video_link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "lms/lesson.ts")]
pub struct UpdateLessonRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub text_content: Option<String>,
    pub video_link: Option<String>,
}
