//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! 时间统一存为 Unix 秒，媒体引用列表存为 JSON 文本。

pub mod prelude;

pub mod assignments;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod lessons;
pub mod modules;
pub mod submissions;
pub mod users;

use chrono::{DateTime, Utc};

pub(crate) fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
}

pub(crate) fn ts_opt(secs: Option<i64>) -> Option<DateTime<Utc>> {
    secs.and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
}
