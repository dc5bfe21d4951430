use chrono::{DateTime, Utc};

use super::deadline;
use crate::errors::{LmsError, Result};

/// 发布开关的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishState {
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

/// 手动切换发布状态：发布时记录时间，取消发布时清空
pub fn toggle(currently_published: bool, now: DateTime<Utc>) -> PublishState {
    if currently_published {
        PublishState {
            published: false,
            published_at: None,
        }
    } else {
        PublishState {
            published: true,
            published_at: Some(now),
        }
    }
}

/// 作业发布开关：已过截止时间的作业不能发布
pub fn toggle_assignment(
    currently_published: bool,
    due: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<PublishState> {
    if !currently_published && !deadline::edit_window_open(now, due) {
        return Err(LmsError::conflict_with_reason(
            "deadline_passed",
            "Cannot publish an assignment whose due date has passed",
        ));
    }
    Ok(toggle(currently_published, now))
}

/// 截止时间必须严格晚于当前时间
pub fn validate_due_date(due: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    if due <= now {
        return Err(LmsError::validation_with_reason(
            "due_date_not_future",
            "Due date must be in the future",
        ));
    }
    Ok(())
}

pub fn validate_max_marks(max_marks: f64) -> Result<()> {
    if !max_marks.is_finite() || max_marks <= 0.0 {
        return Err(LmsError::validation_with_reason(
            "invalid_max_marks",
            "Max marks must be greater than 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn toggling_twice_restores_and_clears_timestamp() {
        let now = Utc::now();
        let due = now + Duration::days(1);
        let first = toggle_assignment(false, due, now).unwrap();
        assert!(first.published);
        assert_eq!(first.published_at, Some(now));

        let second = toggle_assignment(first.published, due, now).unwrap();
        assert!(!second.published);
        assert_eq!(second.published_at, None);
    }

    #[test]
    fn past_due_assignment_cannot_be_published_but_can_be_unpublished() {
        let now = Utc::now();
        let due = now - Duration::minutes(1);
        let err = toggle_assignment(false, due, now).unwrap_err();
        assert_eq!(err.reason(), "deadline_passed");
        assert!(toggle_assignment(true, due, now).is_ok());
    }

    #[test]
    fn due_date_must_be_strictly_future() {
        let now = Utc::now();
        assert!(validate_due_date(now, now).is_err());
        assert!(validate_due_date(now - Duration::seconds(1), now).is_err());
        assert!(validate_due_date(now + Duration::seconds(1), now).is_ok());
    }

    #[test]
    fn max_marks_positive() {
        assert!(validate_max_marks(0.0).is_err());
        assert!(validate_max_marks(-5.0).is_err());
        assert!(validate_max_marks(f64::INFINITY).is_err());
        assert!(validate_max_marks(100.0).is_ok());
    }
}
