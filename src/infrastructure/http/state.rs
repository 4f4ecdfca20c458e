//! Application State
//!
//! HTTP 层共享状态:调度器、冻结后的注册表、凭证编解码器

use std::sync::Arc;

use crate::application::dispatch::{Dispatcher, ModuleRegistry};
use crate::application::ports::TokenCodecPort;

/// 应用状态
pub struct AppState {
    /// 传输层唯一的调用入口
    pub dispatcher: Dispatcher,
    /// 发现端点直接读注册表,不走调度路径
    pub registry: Arc<ModuleRegistry>,
    /// Authorization 头解码
    pub token_codec: Arc<dyn TokenCodecPort>,
}

impl AppState {
    pub fn new(
        dispatcher: Dispatcher,
        registry: Arc<ModuleRegistry>,
        token_codec: Arc<dyn TokenCodecPort>,
    ) -> Self {
        Self {
            dispatcher,
            registry,
            token_codec,
        }
    }
}
