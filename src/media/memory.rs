use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use uuid::Uuid;

use super::{MediaStore, UploadedFile};
use crate::errors::{LmsError, Result};
use crate::models::media::MediaRef;

/// 内存存储，用于测试和无持久化部署
#[derive(Default)]
pub struct MemoryMediaStore {
    blobs: DashMap<String, Vec<u8>>,
    // 成功 put 的次数上限，超过后 put 失败
    put_limit: Option<usize>,
    puts: AtomicUsize,
    fail_deletes: AtomicBool,
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_after(successful_puts: usize) -> Self {
        Self {
            put_limit: Some(successful_puts),
            ..Self::default()
        }
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, ref_id: &str) -> bool {
        self.blobs.contains_key(ref_id)
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn put(&self, file: &UploadedFile, folder: &str) -> Result<MediaRef> {
        let n = self.puts.fetch_add(1, Ordering::SeqCst);
        if self.put_limit.is_some_and(|limit| n >= limit) {
            return Err(LmsError::media_store("Media store rejected the upload"));
        }

        let ref_id = format!("{folder}/{}", Uuid::new_v4());
        self.blobs.insert(ref_id.clone(), file.data.clone());
        Ok(MediaRef {
            url: format!("memory://{ref_id}"),
            ref_id,
            bytes: file.data.len() as i64,
            format: file.extension(),
            original_filename: file.filename.clone(),
        })
    }

    async fn delete(&self, ref_id: &str) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(LmsError::media_store(format!("Failed to delete {ref_id}")));
        }
        self.blobs.remove(ref_id);
        Ok(())
    }
}
