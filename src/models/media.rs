use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 媒体存储返回的稳定引用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lms/media.ts")]
pub struct MediaRef {
    pub ref_id: String,
    pub url: String,
    pub bytes: i64,
    pub format: String,
    pub original_filename: String,
}

impl MediaRef {
    /// 从数据库 JSON 文本解析，损坏的数据按空列表处理
    pub fn list_from_json(raw: &str) -> Vec<MediaRef> {
        serde_json::from_str(raw).unwrap_or_default()
    }

    pub fn list_to_json(refs: &[MediaRef]) -> String {
        serde_json::to_string(refs).unwrap_or_else(|_| "[]".to_string())
    }
}
