//! Attachment Storage Port - 附件二进制存储

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;

/// 存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 附件流读取端
pub type AttachmentStream = Box<dyn AsyncRead + Send + Unpin>;

/// 附件存储端口
///
/// 元数据在仓储里,这里只负责字节;下载走流式读取,
/// 不把整个文件读进内存
#[async_trait]
pub trait AttachmentStoragePort: Send + Sync {
    /// 保存附件内容,返回存储路径
    async fn save(&self, attachment_id: &str, data: &[u8]) -> Result<String, StorageError>;

    /// 打开存储路径用于流式读取
    async fn open(&self, stored_path: &str) -> Result<AttachmentStream, StorageError>;

    /// 删除附件内容,不存在时静默成功
    async fn delete(&self, stored_path: &str) -> Result<(), StorageError>;
}
