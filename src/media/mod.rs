//! 媒体存储
//!
//! 上传在写库之前完成；同一批次中途失败时，已上传的文件尽力释放。

pub mod local;
pub mod memory;

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

use crate::config::{AppConfig, UploadConfig};
use crate::errors::{LmsError, Result};
use crate::models::media::MediaRef;

pub use local::LocalMediaStore;
pub use memory::MemoryMediaStore;

/// 请求中解析出的单个文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            data,
        }
    }

    /// 小写扩展名，不含点
    pub fn extension(&self) -> String {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default()
    }
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn put(&self, file: &UploadedFile, folder: &str) -> Result<MediaRef>;
    /// 引用不存在时视为成功
    async fn delete(&self, ref_id: &str) -> Result<()>;
}

pub fn create_media_store() -> Result<Arc<dyn MediaStore>> {
    let config = &AppConfig::get().upload;
    match config.backend.as_str() {
        "local" => Ok(Arc::new(LocalMediaStore::new(&config.dir, &config.public_url))),
        "memory" => Ok(Arc::new(MemoryMediaStore::new())),
        other => Err(LmsError::media_store(format!(
            "Unknown media backend '{other}', expected 'local' or 'memory'"
        ))),
    }
}

/// 校验数量、大小和扩展名
pub fn check_uploads(files: &[UploadedFile], config: &UploadConfig) -> Result<()> {
    if files.len() > config.max_files {
        return Err(LmsError::validation_with_reason(
            "too_many_files",
            format!("At most {} files per request", config.max_files),
        ));
    }
    for file in files {
        if file.data.len() > config.max_size {
            return Err(LmsError::validation_with_reason(
                "file_too_large",
                format!("File '{}' exceeds {} bytes", file.filename, config.max_size),
            ));
        }
        let ext = file.extension();
        if !config
            .allowed_types
            .iter()
            .any(|t| t.trim_start_matches('.').eq_ignore_ascii_case(&ext))
        {
            return Err(LmsError::validation_with_reason(
                "file_type_not_allowed",
                format!("File type of '{}' is not allowed", file.filename),
            ));
        }
    }
    Ok(())
}

/// 依次上传；任一失败时释放本批次已上传的文件并返回错误
pub async fn put_all(
    store: &dyn MediaStore,
    files: &[UploadedFile],
    folder: &str,
) -> Result<Vec<MediaRef>> {
    let mut stored = Vec::with_capacity(files.len());
    for file in files {
        match store.put(file, folder).await {
            Ok(media) => stored.push(media),
            Err(e) => {
                release_all(store, &stored).await;
                return Err(e);
            }
        }
    }
    Ok(stored)
}

/// 尽力删除，失败只记录日志
pub async fn release_all(store: &dyn MediaStore, refs: &[MediaRef]) {
    for media in refs {
        if let Err(e) = store.delete(&media.ref_id).await {
            warn!("Failed to release media {}: {}", media.ref_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload_config() -> UploadConfig {
        UploadConfig {
            backend: "memory".into(),
            dir: "uploads".into(),
            public_url: "/media".into(),
            max_size: 8,
            max_files: 2,
            allowed_types: vec![".pdf".into(), "png".into()],
        }
    }

    #[test]
    fn check_uploads_reports_reason() {
        let config = upload_config();
        let ok = vec![UploadedFile::new("a.PDF", vec![1, 2, 3])];
        assert!(check_uploads(&ok, &config).is_ok());

        let big = vec![UploadedFile::new("a.png", vec![0; 9])];
        assert_eq!(
            check_uploads(&big, &config).unwrap_err().reason(),
            "file_too_large"
        );

        let exe = vec![UploadedFile::new("run.exe", vec![0])];
        assert_eq!(
            check_uploads(&exe, &config).unwrap_err().reason(),
            "file_type_not_allowed"
        );

        let many = vec![UploadedFile::new("a.pdf", vec![0]); 3];
        assert_eq!(
            check_uploads(&many, &config).unwrap_err().reason(),
            "too_many_files"
        );
    }

    #[tokio::test]
    async fn put_all_releases_partial_batch() {
        let store = MemoryMediaStore::failing_after(1);
        let files = vec![
            UploadedFile::new("a.pdf", vec![1]),
            UploadedFile::new("b.pdf", vec![2]),
        ];
        assert!(put_all(&store, &files, "lessons").await.is_err());
        assert_eq!(store.len(), 0);
    }
}
