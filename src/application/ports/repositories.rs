//! Repository Ports - 持久化出站端口
//!
//! 处理器直接依赖这些接口,Dispatcher 对其不可见。
//! 分页与软删除语义由 Contract 仓储的查询面承担

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Attachment, Contract, User};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// User Repository
// ============================================================================

/// User Repository Port
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    /// 根据 ID 查找用户
    async fn get(&self, id: &str) -> Result<Option<User>, RepositoryError>;

    /// 根据用户名查找用户
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    /// 新增用户
    async fn add(&self, user: &User) -> Result<(), RepositoryError>;

    /// 更新用户
    async fn update(&self, user: &User) -> Result<(), RepositoryError>;

    /// 删除用户(硬删除)
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}

// ============================================================================
// Contract Repository
// ============================================================================

/// Contract Repository Port
#[async_trait]
pub trait ContractRepositoryPort: Send + Sync {
    /// 根据 ID 查找合同
    async fn get(&self, id: &str, include_deleted: bool) -> Result<Option<Contract>, RepositoryError>;

    /// 获取所有合同
    async fn get_all(&self, include_deleted: bool) -> Result<Vec<Contract>, RepositoryError>;

    /// 分页获取合同,返回 (当前页, 总数),软删除行被过滤
    async fn paged(
        &self,
        page_number: u32,
        page_size: u32,
        include_deleted: bool,
    ) -> Result<(Vec<Contract>, u64), RepositoryError>;

    /// 新增合同
    async fn add(&self, contract: &Contract) -> Result<(), RepositoryError>;

    /// 更新合同
    async fn update(&self, contract: &Contract) -> Result<(), RepositoryError>;

    /// 删除合同,soft 为 true 时仅置位 is_deleted
    async fn delete(&self, id: &str, soft: bool) -> Result<(), RepositoryError>;
}

// ============================================================================
// Attachment Repository
// ============================================================================

/// Attachment Repository Port
#[async_trait]
pub trait AttachmentRepositoryPort: Send + Sync {
    /// 根据 ID 查找附件
    async fn get(&self, id: &str) -> Result<Option<Attachment>, RepositoryError>;

    /// 获取合同的全部附件
    async fn find_by_contract(&self, contract_id: &str) -> Result<Vec<Attachment>, RepositoryError>;

    /// 新增附件
    async fn add(&self, attachment: &Attachment) -> Result<(), RepositoryError>;

    /// 删除合同的全部附件,返回删除条数
    async fn delete_by_contract(&self, contract_id: &str) -> Result<u64, RepositoryError>;
}
