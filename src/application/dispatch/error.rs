//! 调度拒绝错误
//!
//! 这四类都在处理器执行之前快速失败,由传输层直接拒绝,
//! 不走结果信封

use thiserror::Error;

/// 调度前置拒绝
#[derive(Debug, Error)]
pub enum DispatchError {
    /// 未知或未注册的模块名
    #[error("Invalid module {0}")]
    InvalidModule(String),

    /// 请求名在模块/类别内无法解析
    #[error("Handler not found for request {name} in module {module}")]
    HandlerNotFound { module: String, name: String },

    /// 处理器要求身份而身份缺失
    #[error("Access token is not provided.")]
    Unauthorized,

    /// public 路由触达了未允许匿名的处理器
    #[error("Handler is not available for anonymous access.")]
    Forbidden,
}
