use chrono::{DateTime, Utc};

/// 创建时判定迟交：严格晚于截止时间
pub fn is_late(now: DateTime<Utc>, due: DateTime<Utc>) -> bool {
    now > due
}

/// 编辑窗口：到达截止时间即关闭
pub fn edit_window_open(now: DateTime<Utc>, due: DateTime<Utc>) -> bool {
    now < due
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn boundary_instant_is_on_time_but_not_editable() {
        let due = Utc::now();
        assert!(!is_late(due, due));
        assert!(!edit_window_open(due, due));
    }

    #[test]
    fn one_second_either_side() {
        let due = Utc::now();
        let before = due - Duration::seconds(1);
        let after = due + Duration::seconds(1);
        assert!(!is_late(before, due));
        assert!(edit_window_open(before, due));
        assert!(is_late(after, due));
        assert!(!edit_window_open(after, due));
    }
}
