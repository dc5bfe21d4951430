use crate::models::{common::PaginationQuery, enrollments::entities::EnrollmentRole};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "lms/enrollment.ts")]
pub struct EnrollRequest {
    pub user_id: i64,
    pub role: EnrollmentRole,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "lms/enrollment.ts")]
pub struct EnrollmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<EnrollmentRole>,
}
