//! AccessIdentity - 调用方身份
//!
//! 从 Bearer 凭证解码,仅在单次调用内有效,不持久化。
//! 授权门只检查身份是否存在,从不检查内容

use serde::{Deserialize, Serialize};

/// 调用方身份
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessIdentity {
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl AccessIdentity {
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            name: None,
            is_admin: false,
        }
    }
}
