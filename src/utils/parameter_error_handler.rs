//! 请求参数解析失败时返回统一的 JSON 错误

use actix_web::{
    Error, HttpRequest,
    error::{JsonPayloadError, PathError, QueryPayloadError},
};

use crate::errors::LmsError;

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    LmsError::validation_with_reason("invalid_json", format!("Invalid JSON body: {err}")).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    LmsError::validation_with_reason("invalid_query", format!("Invalid query: {err}")).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> Error {
    LmsError::validation_with_reason("invalid_path", format!("Invalid path parameter: {err}"))
        .into()
}
