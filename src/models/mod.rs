pub mod assignments;
pub mod common;
pub mod course_modules;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod lessons;
pub mod media;
pub mod submissions;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery, SetActiveRequest};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务响应码，写入 `ApiResponse.code`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lms/api.ts")]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    InvalidState = 1006,
    PayloadTooLarge = 1007,

    // 媒体
    FileTypeNotAllowed = 2001,
    FileSizeExceeded = 2002,
    TooManyFiles = 2003,
    MediaStoreFailed = 2004,

    InternalServerError = 5000,
}
