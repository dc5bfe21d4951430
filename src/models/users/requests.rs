use crate::models::{common::PaginationQuery, users::entities::GlobalRole};
use serde::Deserialize;
use ts_rs::TS;

// 创建用户请求（凭证由外部身份服务管理）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "lms/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: GlobalRole,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "lms/user.ts")]
pub struct UserListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<GlobalRole>,
    pub search: Option<String>,
}
