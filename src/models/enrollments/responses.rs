use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{
    courses::entities::Course,
    enrollments::entities::{Enrollment, EnrollmentRole},
    users::entities::UserBrief,
};

/// 课程参与者（选课记录 + 用户信息）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lms/enrollment.ts")]
pub struct Participant {
    pub enrollment_id: i64,
    pub role: EnrollmentRole,
    pub user: UserBrief,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lms/enrollment.ts")]
pub struct ParticipantGroups {
    pub teachers: Vec<Participant>,
    pub students: Vec<Participant>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lms/enrollment.ts")]
pub struct EnrollmentSummary {
    pub course_id: i64,
    pub teachers: i64,
    pub students: i64,
    pub total: i64,
}

/// 我的选课
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lms/enrollment.ts")]
pub struct MyEnrollment {
    pub enrollment: Enrollment,
    pub course: Course,
}
