use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use super::{MediaStore, UploadedFile};
use crate::errors::{LmsError, Result};
use crate::models::media::MediaRef;

/// 本地文件系统存储，ref_id 为相对上传目录的路径
pub struct LocalMediaStore {
    root: PathBuf,
    public_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl AsRef<Path>, public_url: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    fn resolve(&self, ref_id: &str) -> Result<PathBuf> {
        let rel = Path::new(ref_id);
        if rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(LmsError::media_store(format!("Invalid media reference: {ref_id}")));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn put(&self, file: &UploadedFile, folder: &str) -> Result<MediaRef> {
        let ext = file.extension();
        let stored_name = if ext.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            format!("{}.{}", Uuid::new_v4(), ext)
        };
        let ref_id = format!("{folder}/{stored_name}");
        let path = self.resolve(&ref_id)?;

        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| LmsError::media_store(format!("创建上传目录失败: {e}")))?;
        }
        tokio::fs::write(&path, &file.data)
            .await
            .map_err(|e| LmsError::media_store(format!("写入文件失败: {e}")))?;

        debug!("Stored {} ({} bytes) as {}", file.filename, file.data.len(), ref_id);
        Ok(MediaRef {
            url: format!("{}/{}", self.public_url, ref_id),
            ref_id,
            bytes: file.data.len() as i64,
            format: ext,
            original_filename: file.filename.clone(),
        })
    }

    async fn delete(&self, ref_id: &str) -> Result<()> {
        let path = self.resolve(ref_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LmsError::media_store(format!("删除文件失败 {ref_id}: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_delete_round_trip_on_disk() {
        let root = std::env::temp_dir().join(format!("lms-media-{}", Uuid::new_v4()));
        let store = LocalMediaStore::new(&root, "/media/");

        let media = store
            .put(&UploadedFile::new("Notes.PDF", b"%PDF".to_vec()), "lessons")
            .await
            .unwrap();
        assert!(media.ref_id.starts_with("lessons/"));
        assert!(media.url.starts_with("/media/lessons/"));
        assert_eq!(media.format, "pdf");
        assert_eq!(media.bytes, 4);
        assert!(root.join(&media.ref_id).exists());

        store.delete(&media.ref_id).await.unwrap();
        assert!(!root.join(&media.ref_id).exists());
        // 重复删除不报错
        store.delete(&media.ref_id).await.unwrap();

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn rejects_path_traversal() {
        let store = LocalMediaStore::new("uploads", "/media");
        assert!(store.delete("../etc/passwd").await.is_err());
    }
}
