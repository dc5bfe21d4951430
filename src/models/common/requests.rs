use serde::Deserialize;
use ts_rs::TS;

// 启用 / 停用开关
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "lms/api.ts")]
pub struct SetActiveRequest {
    pub active: bool,
}
