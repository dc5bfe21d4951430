use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::GlobalRole;

// 课程内角色，只授予单门课程的能力
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "lms/enrollment.ts")]
pub enum EnrollmentRole {
    Teacher,
    Student,
}

impl EnrollmentRole {
    pub const TEACHER: &'static str = "teacher";
    pub const STUDENT: &'static str = "student";

    /// 该选课角色要求的全局角色
    pub fn required_global_role(&self) -> GlobalRole {
        match self {
            EnrollmentRole::Teacher => GlobalRole::Teacher,
            EnrollmentRole::Student => GlobalRole::Student,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentRole::Teacher => Self::TEACHER,
            EnrollmentRole::Student => Self::STUDENT,
        }
    }
}

impl<'de> Deserialize<'de> for EnrollmentRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的选课角色: '{s}'. 支持的角色: teacher, student"
            ))
        })
    }
}

impl std::fmt::Display for EnrollmentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EnrollmentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            EnrollmentRole::TEACHER => Ok(EnrollmentRole::Teacher),
            EnrollmentRole::STUDENT => Ok(EnrollmentRole::Student),
            _ => Err(format!("Invalid enrollment role: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lms/enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub role: EnrollmentRole,
    pub enrolled_by: i64,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}
