//! 动态命令/查询调度引擎
//!
//! - handler: Command/Query 双变体能力接口与参数/响应契约
//! - registry: 显式注册表,启动期可变,冻结后并发只读
//! - dispatcher: 解析 -> 授权 -> 绑定校验 -> 执行 -> 结果信封
//! - error: 执行前的快速拒绝

pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod registry;

pub use dispatcher::{authorize, Dispatched, Dispatcher};
pub use error::DispatchError;
pub use handler::{
    ExecutionContext, FileResponse, FormPayload, HandlerKind, HandlerOutput, ModelShape,
    ParameterModel, RequestHandler, ResponseModel, RouteVisibility, UploadedFile,
};
pub use registry::{
    HandlerDescriptor, HandlerDetail, HandlerEntry, ModuleRegistry, RegistryBuilder,
};
