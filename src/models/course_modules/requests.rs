use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "lms/module.ts")]
pub struct CreateModuleRequest {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "lms/module.ts")]
pub struct UpdateModuleRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}
