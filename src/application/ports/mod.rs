//! Ports - 出站端口
//!
//! 定义核心依赖的抽象接口,具体实现在 infrastructure 层
//! (SQLite 仓储、文件系统存储、HMAC 凭证编解码、Argon2 口令哈希)

mod password;
mod repositories;
mod storage;
mod token;

pub use password::PasswordHasherPort;
pub use repositories::{
    AttachmentRepositoryPort, ContractRepositoryPort, RepositoryError, UserRepositoryPort,
};
pub use storage::{AttachmentStoragePort, AttachmentStream, StorageError};
pub use token::TokenCodecPort;
