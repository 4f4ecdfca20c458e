//! 领域层
//!
//! - Module: 处理器命名空间划分
//! - User: 用户账户实体
//! - Contract: 合同上下文(合同 + 附件)

pub mod contract;
pub mod module;
pub mod user;

pub use contract::{Attachment, Contract};
pub use module::Module;
pub use user::User;
