//! 应用层
//!
//! - dispatch: 动态命令/查询调度引擎(注册表、解析、授权、调度)
//! - ports: 出站端口(仓储、存储、凭证、口令)
//! - params/responses: 线上参数与响应模型
//! - commands/queries: 业务处理器
//! - bootstrap: 各模块的显式注册表

pub mod bootstrap;
pub mod commands;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod params;
pub mod ports;
pub mod queries;
pub mod responses;
pub mod services;
pub mod validate;

pub use bootstrap::build_registry;
pub use dispatch::{Dispatched, Dispatcher, HandlerKind, ModuleRegistry, RouteVisibility};
pub use envelope::{ErrorKind, RequestEnvelope, ResultEnvelope};
pub use error::ApplicationError;
pub use identity::AccessIdentity;
pub use services::AppServices;
