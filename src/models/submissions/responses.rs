use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserBrief;

/// 单个作业的提交统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lms/submission.ts")]
pub struct AssignmentSummary {
    pub total: i64,
    pub submitted: i64,
    pub late: i64,
    pub graded: i64,
    pub pending: i64,
}

/// 选课学生视角的提交状态，未提交时 status 为 "not_submitted"
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lms/submission.ts")]
pub struct SubmissionStatusRow {
    pub student: UserBrief,
    pub status: String,
    pub submission_id: Option<i64>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_late: bool,
    pub grade: Option<f64>,
}
