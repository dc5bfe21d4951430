//! multipart 请求解析
//!
//! 约定：名为 `data` 的字段是 JSON 请求体，名为 `files` / `file` 的字段是附件。

use actix_multipart::Multipart;
use futures_util::TryStreamExt;
use serde::de::DeserializeOwned;

use crate::config::UploadConfig;
use crate::errors::{LmsError, Result};
use crate::media::UploadedFile;

const DATA_FIELD: &str = "data";
const FILE_FIELDS: &[&str] = &["files", "file"];

pub struct MultipartForm<T> {
    pub data: Option<T>,
    pub files: Vec<UploadedFile>,
}

impl<T> MultipartForm<T> {
    /// 创建类请求必须携带 data 字段
    pub fn require_data(self) -> Result<(T, Vec<UploadedFile>)> {
        match self.data {
            Some(data) => Ok((data, self.files)),
            None => Err(LmsError::validation_with_reason(
                "missing_field",
                "Multipart field 'data' is required",
            )),
        }
    }
}

impl<T: Default> MultipartForm<T> {
    /// 更新类请求：data 缺省为空更新，没有附件时不替换
    pub fn into_update(self) -> (T, Option<Vec<UploadedFile>>) {
        let files = (!self.files.is_empty()).then_some(self.files);
        (self.data.unwrap_or_default(), files)
    }
}

/// 读取全部字段；单个字段超过 `max_size` 或文件数超过 `max_files` 时立即中止
pub async fn read_multipart<T: DeserializeOwned>(
    mut payload: Multipart,
    limits: &UploadConfig,
) -> Result<MultipartForm<T>> {
    let mut data = None;
    let mut files = Vec::new();

    while let Some(mut field) = payload.try_next().await.map_err(multipart_err)? {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        let filename = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string());
        let content_type = field.content_type().map(|ct| ct.to_string());

        let is_file = FILE_FIELDS.contains(&name.as_str());
        // 超出数量的文件不再读取
        if is_file && files.len() >= limits.max_files {
            return Err(LmsError::validation_with_reason(
                "too_many_files",
                format!("At most {} files per request", limits.max_files),
            ));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(multipart_err)? {
            bytes.extend_from_slice(&chunk);
            if bytes.len() > limits.max_size {
                return Err(LmsError::validation_with_reason(
                    "file_too_large",
                    format!("Field '{name}' exceeds {} bytes", limits.max_size),
                ));
            }
        }

        if name == DATA_FIELD {
            data = Some(serde_json::from_slice(&bytes).map_err(|e| {
                LmsError::validation_with_reason("invalid_json", format!("Invalid data: {e}"))
            })?);
        } else if is_file {
            let mut file = UploadedFile::new(filename.unwrap_or_default(), bytes);
            file.content_type = content_type;
            files.push(file);
        }
    }

    Ok(MultipartForm { data, files })
}

fn multipart_err(e: actix_multipart::MultipartError) -> LmsError {
    LmsError::validation_with_reason("invalid_multipart", e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::error::PayloadError;
    use actix_web::http::header::{self, HeaderMap, HeaderValue};
    use actix_web::web::Bytes;
    use serde::Deserialize;

    const BOUNDARY: &str = "lms-boundary";

    #[derive(Debug, Deserialize)]
    struct Body {
        title: String,
    }

    fn limits(max_files: usize) -> UploadConfig {
        UploadConfig {
            backend: "memory".into(),
            dir: "uploads".into(),
            public_url: "/uploads".into(),
            max_size: 64,
            max_files,
            allowed_types: vec![".pdf".into()],
        }
    }

    fn part(name: &str, filename: Option<&str>, content: &str) -> String {
        let disposition = match filename {
            Some(f) => format!("form-data; name=\"{name}\"; filename=\"{f}\""),
            None => format!("form-data; name=\"{name}\""),
        };
        format!("--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\n\r\n{content}\r\n")
    }

    fn payload(parts: &[String]) -> Multipart {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(&format!("multipart/form-data; boundary={BOUNDARY}")).unwrap(),
        );
        let body = format!("{}--{BOUNDARY}--\r\n", parts.concat());
        let stream = futures_util::stream::once(async move {
            Ok::<_, PayloadError>(Bytes::from(body))
        });
        Multipart::new(&headers, stream)
    }

    #[actix_web::test]
    async fn test_reads_data_and_files() {
        let parts = [
            part("data", None, r#"{"title":"Week 1"}"#),
            part("files", Some("a.pdf"), "aaa"),
            part("file", Some("b.pdf"), "bbb"),
        ];
        let form = read_multipart::<Body>(payload(&parts), &limits(2))
            .await
            .unwrap();
        assert_eq!(form.data.unwrap().title, "Week 1");
        let names: Vec<_> = form.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }

    #[actix_web::test]
    async fn test_stops_at_file_limit() {
        let parts = [
            part("files", Some("a.pdf"), "aaa"),
            part("files", Some("b.pdf"), "bbb"),
            part("files", Some("c.pdf"), "ccc"),
        ];
        let err = read_multipart::<Body>(payload(&parts), &limits(2))
            .await
            .err()
            .unwrap();
        assert_eq!(err.reason(), "too_many_files");
    }

    #[actix_web::test]
    async fn test_rejects_oversized_field() {
        let big = "x".repeat(65);
        let parts = [part("files", Some("a.pdf"), &big)];
        let err = read_multipart::<Body>(payload(&parts), &limits(2))
            .await
            .err()
            .unwrap();
        assert_eq!(err.reason(), "file_too_large");
    }
}
