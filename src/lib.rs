//! Pactum - 用户/合同管理后台
//!
//! 架构设计: 分层 + CQRS 动态调度
//!
//! 领域层 (domain/):
//! - Module: 处理器命名空间划分
//! - User / Contract / Attachment 实体
//!
//! 应用层 (application/):
//! - dispatch: 动态命令/查询调度引擎(注册表、解析、授权门、调度器)
//! - Ports: 出站端口(仓储、附件存储、凭证、口令哈希)
//! - Commands/Queries: 业务处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: Command/Query/Public 三个调用面 + 发现端点
//! - Persistence: SQLite 仓储
//! - Storage: 文件系统附件存储
//! - Auth: HMAC 凭证 + Argon2 口令哈希
//! - Seed: 启动期缺省管理员

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
