//! AppServices - 处理器依赖容器
//!
//! 每次调度构造处理器新实例时从这里取共享端口;
//! 端口本身无状态且线程安全,可跨调用共享

use std::sync::Arc;

use crate::application::ports::{
    AttachmentRepositoryPort, AttachmentStoragePort, ContractRepositoryPort, PasswordHasherPort,
    TokenCodecPort, UserRepositoryPort,
};

/// 处理器依赖容器
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<dyn UserRepositoryPort>,
    pub contracts: Arc<dyn ContractRepositoryPort>,
    pub attachments: Arc<dyn AttachmentRepositoryPort>,
    pub attachment_storage: Arc<dyn AttachmentStoragePort>,
    pub token_codec: Arc<dyn TokenCodecPort>,
    pub password_hasher: Arc<dyn PasswordHasherPort>,
}
