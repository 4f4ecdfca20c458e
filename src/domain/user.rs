//! User - 用户账户实体

use chrono::{DateTime, Utc};

/// 用户账户
///
/// 不变量: id 与 username 相同,注册时确定且不再变化
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    /// 口令哈希,永不存放明文
    pub password_hash: String,
    pub is_enabled: bool,
    pub is_system_admin: bool,
    pub is_locked: bool,
    pub create_time: DateTime<Utc>,
    pub last_modified_time: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

impl User {
    /// 创建新用户(注册入口)
    pub fn new(username: impl Into<String>, name: Option<String>, password_hash: String) -> Self {
        let username = username.into();
        Self {
            id: username.clone(),
            username,
            name,
            password_hash,
            is_enabled: true,
            is_system_admin: false,
            is_locked: false,
            create_time: Utc::now(),
            last_modified_time: None,
            is_deleted: false,
        }
    }

    /// 账户是否可登录
    pub fn can_sign_in(&self) -> bool {
        self.is_enabled && !self.is_locked && !self.is_deleted
    }
}
