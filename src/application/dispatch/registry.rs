//! Module Registry - 模块到处理器的注册表
//!
//! 显式注册表替代反射扫描:每个处理器在启动时由所属模块的
//! 引导代码登记一次,名字到类型的映射静态可查。
//!
//! 生命周期: RegistryBuilder 仅在启动阶段可变,freeze 之后的
//! ModuleRegistry 不可变,被所有在途请求并发只读共享

use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;

use super::error::DispatchError;
use super::handler::{
    ExecutionContext, FormPayload, HandlerFactory, HandlerKind, HandlerOutput, ModelShape,
    ParameterModel, RequestHandler, ResponseModel,
};
use crate::application::services::AppServices;
use crate::application::validate::{Validate, Violation};
use crate::domain::Module;

/// Boxed future,类型擦除后的处理器返回值
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// 绑定/校验/执行阶段的失败
///
/// Binding 与 Validation 发生在处理器构造之前,
/// Execution 是处理器内部上抛的任意错误
pub enum InvokeError {
    Binding(String),
    Validation(Vec<Violation>),
    Execution(anyhow::Error),
}

/// 类型擦除后的调用入口
///
/// 绑定参数、跑规则集、构造处理器新实例、执行;
/// 单一多态调用点,调用期没有类型内省
pub(crate) trait ErasedHandler: Send + Sync {
    fn invoke(
        &self,
        services: Arc<AppServices>,
        raw: serde_json::Value,
        form: Option<FormPayload>,
        ctx: ExecutionContext,
    ) -> BoxFuture<'static, Result<HandlerOutput, InvokeError>>;
}

/// 把具体处理器类型包进擦除入口
struct TypedEntry<H, F> {
    factory: F,
    _phantom: PhantomData<fn() -> H>,
}

impl<H, F> ErasedHandler for TypedEntry<H, F>
where
    H: RequestHandler,
    F: HandlerFactory<H>,
{
    fn invoke(
        &self,
        services: Arc<AppServices>,
        raw: serde_json::Value,
        form: Option<FormPayload>,
        ctx: ExecutionContext,
    ) -> BoxFuture<'static, Result<HandlerOutput, InvokeError>> {
        if raw.is_null() {
            let err = InvokeError::Binding(
                "Request model does not contain a Parameter property.".to_string(),
            );
            return Box::pin(async move { Err(err) });
        }

        let mut param: H::Param = match serde_json::from_value(raw) {
            Ok(param) => param,
            Err(e) => {
                let err = InvokeError::Binding(format!(
                    "Parameter does not match the expected shape: {}",
                    e
                ));
                return Box::pin(async move { Err(err) });
            }
        };

        if let Some(form) = form {
            param.attach_form(form);
        }

        // 校验失败时处理器从未被构造或调用
        let violations = param.validate();
        if !violations.is_empty() {
            return Box::pin(async move { Err(InvokeError::Validation(violations)) });
        }

        // 每次调用构造新实例:执行作用域不跨调用共享
        let handler = self.factory.build(services.as_ref());
        Box::pin(async move {
            let response = handler
                .execute(param, &ctx)
                .await
                .map_err(InvokeError::Execution)?;
            response.into_output().map_err(InvokeError::Execution)
        })
    }
}

/// 每个注册处理器一份的描述符
#[derive(Debug, Clone)]
pub struct HandlerDescriptor {
    /// 路由用的派生名
    pub name: &'static str,
    pub kind: HandlerKind,
    /// 调用是否要求已验证身份存在
    pub requires_auth: bool,
    /// 是否可经 public 路由到达
    pub allows_anonymous: bool,
    pub parameter_shape: ModelShape,
    pub response_shape: ModelShape,
}

/// 注册表条目:描述符 + 擦除后的调用入口
pub struct HandlerEntry {
    pub descriptor: HandlerDescriptor,
    pub(crate) handler: Box<dyn ErasedHandler>,
}

/// Detail 发现端点的响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HandlerDetail {
    pub command_name: String,
    pub parameter_model: serde_json::Map<String, serde_json::Value>,
    pub response_model: serde_json::Map<String, serde_json::Value>,
}

/// 注册阶段的可变构建器
///
/// 仅在启动的单线程初始化屏障内使用,freeze 之前不服务请求
#[derive(Default)]
pub struct RegistryBuilder {
    modules: HashMap<Module, Vec<HandlerEntry>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为模块登记一个处理器
    ///
    /// 以 (kind, name) 去重,重复登记同一处理器是幂等的
    pub fn register<H, F>(&mut self, module: Module, factory: F) -> &mut Self
    where
        H: RequestHandler,
        F: HandlerFactory<H>,
    {
        let entries = self.modules.entry(module).or_default();
        if entries
            .iter()
            .any(|e| e.descriptor.kind == H::KIND && e.descriptor.name == H::NAME)
        {
            return self;
        }

        tracing::debug!(
            module = %module,
            kind = H::KIND.as_str(),
            name = H::NAME,
            "Registering handler"
        );

        entries.push(HandlerEntry {
            descriptor: HandlerDescriptor {
                name: H::NAME,
                kind: H::KIND,
                requires_auth: H::REQUIRES_AUTH,
                allows_anonymous: H::ALLOWS_ANONYMOUS,
                parameter_shape: <H::Param as ParameterModel>::shape(),
                response_shape: <H::Response as ResponseModel>::shape(),
            },
            handler: Box::new(TypedEntry::<H, F> {
                factory,
                _phantom: PhantomData,
            }),
        });
        self
    }

    /// 结束注册阶段,产出不可变注册表
    pub fn freeze(self) -> ModuleRegistry {
        ModuleRegistry {
            modules: self.modules,
        }
    }
}

/// 冻结后的进程级注册表
///
/// freeze 之后从不变更,请求处理路径只读
pub struct ModuleRegistry {
    modules: HashMap<Module, Vec<HandlerEntry>>,
}

impl ModuleRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// 模块解析 + 登记检查
    ///
    /// 能解析但从未登记过处理器的模块同样视为 InvalidModule
    fn entries(&self, module_name: &str) -> Result<(Module, &[HandlerEntry]), DispatchError> {
        let module = Module::parse(module_name)
            .ok_or_else(|| DispatchError::InvalidModule(module_name.to_string()))?;
        let entries = self
            .modules
            .get(&module)
            .ok_or_else(|| DispatchError::InvalidModule(module_name.to_string()))?;
        Ok((module, entries))
    }

    /// 列出模块内指定类别的处理器名
    pub fn list_handlers(
        &self,
        module_name: &str,
        kind: HandlerKind,
    ) -> Result<Vec<String>, DispatchError> {
        let (_, entries) = self.entries(module_name)?;
        Ok(entries
            .iter()
            .filter(|e| e.descriptor.kind == kind)
            .map(|e| e.descriptor.name.to_string())
            .collect())
    }

    /// 查询处理器的参数/响应形状
    pub fn describe(
        &self,
        module_name: &str,
        kind: HandlerKind,
        name: &str,
    ) -> Result<HandlerDetail, DispatchError> {
        let entry = self.resolve(module_name, kind, name).map(|(_, e)| e)?;
        Ok(HandlerDetail {
            command_name: entry.descriptor.name.to_string(),
            parameter_model: entry.descriptor.parameter_shape.to_json(),
            response_model: entry.descriptor.response_shape.to_json(),
        })
    }

    /// 解析描述符:先按类别过滤,再按派生名精确匹配
    pub(crate) fn resolve(
        &self,
        module_name: &str,
        kind: HandlerKind,
        request_name: &str,
    ) -> Result<(Module, &HandlerEntry), DispatchError> {
        let (module, entries) = self.entries(module_name)?;
        entries
            .iter()
            .filter(|e| e.descriptor.kind == kind)
            .find(|e| e.descriptor.name == request_name)
            .map(|e| (module, e))
            .ok_or_else(|| DispatchError::HandlerNotFound {
                module: module_name.to_string(),
                name: request_name.to_string(),
            })
    }
}
