//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，每个错误携带稳定的原因码（reason）与可读信息。
//! 调用方与测试应当断言原因码，而不是信息文本。

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::access::DenyReason;
use crate::models::{ApiResponse, ErrorCode, common::ErrorBody};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() / error_type() / reason() / message() 方法
/// - status() 与 error_code() 映射
/// - 便捷构造函数（默认原因码与 `*_with_reason` 两种）
macro_rules! define_lms_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $reason:literal, $status:ident, $api_code:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum LmsError {
            $($variant { reason: &'static str, message: String },)*
        }

        impl LmsError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(LmsError::$variant { .. } => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(LmsError::$variant { .. } => $type_name,)*
                }
            }

            /// 获取稳定的原因码
            pub fn reason(&self) -> &'static str {
                match self {
                    $(LmsError::$variant { reason, .. } => reason,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(LmsError::$variant { message, .. } => message,)*
                }
            }

            pub fn status(&self) -> StatusCode {
                match self {
                    $(LmsError::$variant { .. } => StatusCode::$status,)*
                }
            }

            pub fn error_code(&self) -> ErrorCode {
                match self {
                    $(LmsError::$variant { .. } => ErrorCode::$api_code,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl LmsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        LmsError::$variant { reason: $reason, message: msg.into() }
                    }

                    pub fn [<$variant:snake _with_reason>]<T: Into<String>>(
                        reason: &'static str,
                        msg: T,
                    ) -> Self {
                        LmsError::$variant { reason, message: msg.into() }
                    }
                )*
            }
        }
    };
}

define_lms_errors! {
    Validation("E001", "Validation Error", "invalid_input", BAD_REQUEST, ValidationFailed),
    NotFound("E002", "Resource Not Found", "not_found", NOT_FOUND, NotFound),
    AccessDenied("E003", "Access Denied", "not_authorized", FORBIDDEN, Forbidden),
    Conflict("E004", "Conflict", "conflict", CONFLICT, Conflict),
    State("E005", "Invalid State", "invalid_state", UNPROCESSABLE_ENTITY, InvalidState),
    Authentication("E006", "Authentication Error", "unauthenticated", UNAUTHORIZED, Unauthorized),
    CacheConnection("E101", "Cache Connection Error", "cache_unavailable", INTERNAL_SERVER_ERROR, InternalServerError),
    CachePluginNotFound("E102", "Cache Plugin Not Found", "cache_plugin_missing", INTERNAL_SERVER_ERROR, InternalServerError),
    DatabaseConfig("E103", "Database Configuration Error", "database_config", INTERNAL_SERVER_ERROR, InternalServerError),
    DatabaseConnection("E104", "Database Connection Error", "database_unavailable", INTERNAL_SERVER_ERROR, InternalServerError),
    DatabaseOperation("E105", "Database Operation Error", "database_error", INTERNAL_SERVER_ERROR, InternalServerError),
    MediaStore("E106", "Media Store Error", "media_unavailable", BAD_GATEWAY, MediaStoreFailed),
    FileOperation("E107", "File Operation Error", "file_error", INTERNAL_SERVER_ERROR, InternalServerError),
    Serialization("E108", "Serialization Error", "serialization_error", INTERNAL_SERVER_ERROR, InternalServerError),
    DateParse("E109", "Date Parse Error", "invalid_date", BAD_REQUEST, ValidationFailed),
}

impl LmsError {
    /// 预期内的业务错误（4xx），无需按故障处理
    pub fn is_expected(&self) -> bool {
        self.status().is_client_error()
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m ({})\n  {}",
            self.code(),
            self.error_type(),
            self.reason(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{} [{}]: {}", self.error_type(), self.reason(), self.message())
    }
}

impl fmt::Display for LmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LmsError {}

impl ResponseError for LmsError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        if !self.is_expected() {
            tracing::error!("{}", self.format_simple());
        }

        // 非预期错误不向调用方暴露内部细节
        let message = if self.is_expected() {
            self.message().to_string()
        } else {
            self.error_type().to_string()
        };

        HttpResponse::build(self.status()).json(ApiResponse::error(
            self.error_code(),
            ErrorBody {
                error_type: self.error_type().to_string(),
                reason: self.reason().to_string(),
            },
            message,
        ))
    }
}

impl From<DenyReason> for LmsError {
    fn from(reason: DenyReason) -> Self {
        LmsError::access_denied_with_reason(reason.code(), reason.message())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LmsError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                LmsError::conflict_with_reason("duplicate", detail)
            }
            _ => LmsError::database_operation(err.to_string()),
        }
    }
}

impl From<std::io::Error> for LmsError {
    fn from(err: std::io::Error) -> Self {
        LmsError::file_operation(err.to_string())
    }
}

impl From<serde_json::Error> for LmsError {
    fn from(err: serde_json::Error) -> Self {
        LmsError::serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LmsError {
    fn from(err: chrono::ParseError) -> Self {
        LmsError::date_parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LmsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::EntityKind;

    #[test]
    fn test_error_codes() {
        assert_eq!(LmsError::validation("test").code(), "E001");
        assert_eq!(LmsError::access_denied("test").code(), "E003");
        assert_eq!(LmsError::cache_connection("test").code(), "E101");
        assert_eq!(LmsError::authentication("test").code(), "E006");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(LmsError::conflict("test").error_type(), "Conflict");
        assert_eq!(
            LmsError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_default_and_explicit_reason() {
        assert_eq!(LmsError::state("x").reason(), "invalid_state");
        let err = LmsError::state_with_reason("already_graded", "graded");
        assert_eq!(err.reason(), "already_graded");
        assert_eq!(err.message(), "graded");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(LmsError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(LmsError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(LmsError::access_denied("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(LmsError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(
            LmsError::state("x").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert!(LmsError::state("x").is_expected());
        assert!(!LmsError::database_operation("x").is_expected());
    }

    #[test]
    fn test_deny_reason_conversion() {
        let err: LmsError = DenyReason::AncestorInactive {
            kind: EntityKind::Department,
            id: 7,
        }
        .into();
        assert_eq!(err.reason(), "ancestor_inactive");
        assert!(err.message().contains("department 7"));
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_format_simple() {
        let err = LmsError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("invalid_input"));
        assert!(formatted.contains("Invalid URL"));
    }
}
