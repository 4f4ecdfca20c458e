//! Token Codec Port - 访问凭证编解码

use crate::application::identity::AccessIdentity;
use crate::domain::User;

/// 访问凭证编解码端口
///
/// decode 对缺失/畸形/过期的凭证一律返回 None 而不是错误,
/// Dispatcher 把 None 视为匿名调用
pub trait TokenCodecPort: Send + Sync {
    /// 为用户签发凭证
    fn issue(&self, user: &User) -> String;

    /// 解码 Authorization 头的值(形如 "Bearer <token>")
    fn decode(&self, bearer: &str) -> Option<AccessIdentity>;
}
