//! Module - 处理器命名空间
//!
//! 模块集合在进程启动时固定,新增模块意味着一次新的部署,
//! 而不是运行时操作

use std::fmt;

use serde::{Deserialize, Serialize};

/// 逻辑模块名
///
/// 每个模块拥有自己的一组 Command/Query 处理器,
/// 模块之间的请求命名互不冲突
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Module {
    Admin,
    Shop,
    Chat,
}

impl Module {
    /// 规范名称(路由与日志使用大写形式)
    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Admin => "ADMIN",
            Module::Shop => "SHOP",
            Module::Chat => "CHAT",
        }
    }

    /// 解析模块名(大小写不敏感)
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Module::Admin),
            "SHOP" => Some(Module::Shop),
            "CHAT" => Some(Module::Chat),
            _ => None,
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
