use chrono::{DateTime, Utc};

use super::deadline;
use crate::access::{Actor, DenyReason};
use crate::errors::{LmsError, Result};
use crate::models::submissions::entities::SubmissionStatus;

/// 新提交的初始状态
pub fn initial_status(now: DateTime<Utc>, due: DateTime<Utc>) -> SubmissionStatus {
    if deadline::is_late(now, due) {
        SubmissionStatus::Late
    } else {
        SubmissionStatus::Submitted
    }
}

/// 文本与附件至少其一
pub fn require_answer(text_answer: Option<&str>, file_count: usize) -> Result<()> {
    let has_text = text_answer.is_some_and(|t| !t.trim().is_empty());
    if has_text || file_count > 0 {
        Ok(())
    } else {
        Err(DenyReason::MissingAnswer.into())
    }
}

/// 同一学生同一作业只能有一份未删除的提交
pub fn require_no_live(existing: Option<i64>) -> Result<()> {
    match existing {
        Some(id) => Err(LmsError::conflict_with_reason(
            "duplicate_submission",
            format!("You have already submitted this assignment (submission {id})"),
        )),
        None => Ok(()),
    }
}

/// 修改：未评分、未删除且仍在编辑窗口内；评分后只有管理员可改
pub fn check_update(
    actor: &Actor,
    status: SubmissionStatus,
    now: DateTime<Utc>,
    due: DateTime<Utc>,
) -> Result<()> {
    match status {
        SubmissionStatus::Deleted => Err(LmsError::state_with_reason(
            "submission_deleted",
            "Submission has been deleted",
        )),
        SubmissionStatus::Graded if !actor.is_admin() => Err(LmsError::state_with_reason(
            "already_graded",
            "Graded submissions cannot be edited",
        )),
        _ if !actor.is_admin() && !deadline::edit_window_open(now, due) => {
            Err(DenyReason::DeadlinePassed.into())
        }
        _ => Ok(()),
    }
}

/// 评分：0 ≤ grade ≤ max_marks；graded 为终态，仅管理员可重新评分
pub fn check_grade(
    actor: &Actor,
    status: SubmissionStatus,
    grade: f64,
    max_marks: f64,
) -> Result<()> {
    if !grade.is_finite() || grade < 0.0 || grade > max_marks {
        return Err(LmsError::validation_with_reason(
            "grade_out_of_range",
            format!("Grade must be between 0 and {max_marks}"),
        ));
    }
    match status {
        SubmissionStatus::Submitted | SubmissionStatus::Late => Ok(()),
        SubmissionStatus::Graded if actor.is_admin() => Ok(()),
        SubmissionStatus::Graded => Err(LmsError::state_with_reason(
            "already_graded",
            "Submission has already been graded",
        )),
        SubmissionStatus::Deleted => Err(LmsError::state_with_reason(
            "submission_deleted",
            "Cannot grade a deleted submission",
        )),
    }
}

/// 删除：只允许从 submitted / late 软删除
pub fn check_delete(status: SubmissionStatus) -> Result<()> {
    match status {
        SubmissionStatus::Submitted | SubmissionStatus::Late => Ok(()),
        SubmissionStatus::Graded => Err(LmsError::state_with_reason(
            "already_graded",
            "Graded submissions cannot be deleted",
        )),
        SubmissionStatus::Deleted => Err(LmsError::state_with_reason(
            "submission_deleted",
            "Submission has already been deleted",
        )),
    }
}
