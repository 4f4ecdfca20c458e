//! 基础设施层
//!
//! - http: axum 路由与服务器
//! - persistence: SQLite 仓储实现
//! - storage: 文件系统附件存储
//! - auth: 凭证编解码与口令哈希
//! - seed: 启动期数据初始化

pub mod auth;
pub mod http;
pub mod persistence;
pub mod seed;
pub mod storage;
