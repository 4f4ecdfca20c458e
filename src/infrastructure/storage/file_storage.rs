//! File Storage - 文件系统附件存储实现
//!
//! 实现 AttachmentStoragePort trait,按附件 ID 落盘

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{AttachmentStoragePort, AttachmentStream, StorageError};

/// 文件系统附件存储
pub struct FileAttachmentStorage {
    /// 存储根目录
    base_dir: PathBuf,
}

impl FileAttachmentStorage {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl AttachmentStoragePort for FileAttachmentStorage {
    async fn save(&self, attachment_id: &str, data: &[u8]) -> Result<String, StorageError> {
        let path = self.base_dir.join(attachment_id);

        fs::write(&path, data)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        tracing::debug!(
            attachment_id = %attachment_id,
            size = data.len(),
            "Saved attachment bytes"
        );

        Ok(path.to_string_lossy().to_string())
    }

    async fn open(&self, stored_path: &str) -> Result<AttachmentStream, StorageError> {
        let file = fs::File::open(stored_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::FileNotFound(stored_path.to_string())
            } else {
                StorageError::IoError(e.to_string())
            }
        })?;

        Ok(Box::new(file))
    }

    async fn delete(&self, stored_path: &str) -> Result<(), StorageError> {
        match fs::remove_file(stored_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(e.to_string())),
        }
    }
}
