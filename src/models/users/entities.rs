use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 全局角色，与课程内的 EnrollmentRole 相互独立
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "lms/user.ts")]
pub enum GlobalRole {
    Admin,   // 管理员
    Manager, // 教务管理
    Teacher, // 教师
    Student, // 学生
}

impl GlobalRole {
    pub const ADMIN: &'static str = "admin";
    pub const MANAGER: &'static str = "manager";
    pub const TEACHER: &'static str = "teacher";
    pub const STUDENT: &'static str = "student";

    pub fn admin_roles() -> &'static [&'static GlobalRole] {
        &[&Self::Admin]
    }
    pub fn staff_roles() -> &'static [&'static GlobalRole] {
        &[&Self::Admin, &Self::Manager]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalRole::Admin => Self::ADMIN,
            GlobalRole::Manager => Self::MANAGER,
            GlobalRole::Teacher => Self::TEACHER,
            GlobalRole::Student => Self::STUDENT,
        }
    }
}

impl<'de> Deserialize<'de> for GlobalRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: admin, manager, teacher, student"
            ))
        })
    }
}

impl std::fmt::Display for GlobalRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GlobalRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            GlobalRole::ADMIN => Ok(GlobalRole::Admin),
            GlobalRole::MANAGER => Ok(GlobalRole::Manager),
            GlobalRole::TEACHER => Ok(GlobalRole::Teacher),
            GlobalRole::STUDENT => Ok(GlobalRole::Student),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lms/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: GlobalRole,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 列表中展示的用户简要信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lms/user.ts")]
pub struct UserBrief {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub email: String,
}

impl From<&User> for UserBrief {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
        }
    }
}
