//! Parameter Models - 请求参数模型
//!
//! 线格式使用 PascalCase 字段;每个参数类型自带规则集,
//! 形状信息供 Detail 发现端点使用

mod contract;
mod shared;
mod user;

pub use contract::{ContractParameter, UploadContractFileParameter};
pub use shared::{EmptyParameter, GetItemsParameter, IdParameter};
pub use user::{EditUserParameter, LogInParameter, RegistrationParameter, ResetPasswordParameter};
