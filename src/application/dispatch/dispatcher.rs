//! Dispatcher - 调度编排
//!
//! 每次调用走同一条单向流水线:
//! Received -> Resolved -> Authorized -> Bound -> Validated -> Executing
//! -> {Succeeded | Failed}
//!
//! 前四类失败(InvalidModule/HandlerNotFound/Unauthorized/Forbidden)
//! 在执行前快速拒绝;校验失败与执行失败统一表示为
//! success=false 的结果信封。终态之后没有重试或恢复,
//! 调度器视角下每次调用至多执行一次

use std::sync::Arc;

use anyhow::anyhow;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use super::error::DispatchError;
use super::handler::{
    ExecutionContext, FileResponse, FormPayload, HandlerKind, HandlerOutput, RouteVisibility,
};
use super::registry::{ErasedHandler, HandlerDescriptor, InvokeError, ModuleRegistry};
use crate::application::envelope::{ErrorKind, RequestEnvelope, ResultEnvelope};
use crate::application::identity::AccessIdentity;
use crate::application::services::AppServices;
use crate::application::validate::join_violations;

/// 授权门
///
/// 规则按序独立判定,只看身份是否存在,从不检查身份内容;
/// 更细粒度的授权是处理器层的事
pub fn authorize(
    descriptor: &HandlerDescriptor,
    identity: Option<&AccessIdentity>,
    visibility: RouteVisibility,
) -> Result<(), DispatchError> {
    if visibility == RouteVisibility::Public && !descriptor.allows_anonymous {
        return Err(DispatchError::Forbidden);
    }
    if descriptor.requires_auth && identity.is_none() {
        return Err(DispatchError::Unauthorized);
    }
    Ok(())
}

/// 调度结果
///
/// 文件变体让传输层绕开序列化信封直接流式输出
pub enum Dispatched {
    Envelope(ResultEnvelope),
    File(FileResponse),
}

/// 调度器 - 传输层唯一的调用入口
///
/// 自身不持有跨调用状态,注册表冻结后只读,
/// 调用之间完全并行
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ModuleRegistry>,
    services: Arc<AppServices>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ModuleRegistry>, services: Arc<AppServices>) -> Self {
        Self { registry, services }
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// 编排一次调用
    ///
    /// Err 是执行前的传输层拒绝;Ok 一定携带结果信封或文件流
    pub async fn dispatch(
        &self,
        module_name: &str,
        kind: HandlerKind,
        mut envelope: RequestEnvelope,
        visibility: RouteVisibility,
        identity: Option<AccessIdentity>,
        form: Option<FormPayload>,
        cancel: CancellationToken,
    ) -> Result<Dispatched, DispatchError> {
        envelope.received_time = Utc::now();

        // Resolved
        let (module, entry) = self
            .registry
            .resolve(module_name, kind, &envelope.request_name)?;

        // Authorized - 安全边界,任何处理器代码运行之前拒绝
        authorize(&entry.descriptor, identity.as_ref(), visibility)?;

        let ctx = ExecutionContext {
            module,
            identity,
            cancel: cancel.clone(),
        };

        tracing::info!(
            request_id = %envelope.request_id,
            request_name = %envelope.request_name,
            module = %module,
            "Handler started executing"
        );

        // Bound -> Validated -> Executing,取消信号与执行赛跑
        let invocation =
            entry
                .handler
                .invoke(self.services.clone(), envelope.parameter.clone(), form, ctx);
        let outcome = tokio::select! {
            _ = cancel.cancelled() => Err(InvokeError::Execution(anyhow!("Request was cancelled"))),
            result = invocation => result,
        };

        match outcome {
            Ok(HandlerOutput::Json(value)) => {
                let result = ResultEnvelope::success(&envelope, value);
                tracing::info!(
                    request_id = %envelope.request_id,
                    request_name = %envelope.request_name,
                    duration_ms = result.response_duration_ms,
                    "Handler finished executing"
                );
                Ok(Dispatched::Envelope(result))
            }
            Ok(HandlerOutput::File(file)) => {
                tracing::info!(
                    request_id = %envelope.request_id,
                    request_name = %envelope.request_name,
                    file_name = %file.file_name,
                    "Handler produced file response"
                );
                Ok(Dispatched::File(file))
            }
            Err(InvokeError::Binding(message)) => {
                tracing::warn!(
                    request_id = %envelope.request_id,
                    request_name = %envelope.request_name,
                    error = %message,
                    "Parameter binding failed"
                );
                Ok(Dispatched::Envelope(ResultEnvelope::failure(
                    &envelope,
                    ErrorKind::Binding,
                    message,
                )))
            }
            Err(InvokeError::Validation(violations)) => {
                let message = join_violations(&violations);
                tracing::warn!(
                    request_id = %envelope.request_id,
                    request_name = %envelope.request_name,
                    violations = violations.len(),
                    error = %message,
                    "Parameter validation failed"
                );
                Ok(Dispatched::Envelope(ResultEnvelope::failure(
                    &envelope,
                    ErrorKind::Validation,
                    message,
                )))
            }
            Err(InvokeError::Execution(error)) => {
                // 处理器级失败归一化的唯一位置:服务端记录完整错误链,
                // 调用方只拿到顶层消息
                let chain = format!("{:#}", error);
                tracing::error!(
                    request_id = %envelope.request_id,
                    request_name = %envelope.request_name,
                    error = %chain,
                    "Handler error executing"
                );
                Ok(Dispatched::Envelope(ResultEnvelope::failure(
                    &envelope,
                    ErrorKind::Execution,
                    error.to_string(),
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dispatch::handler::ModelShape;

    fn descriptor(requires_auth: bool, allows_anonymous: bool) -> HandlerDescriptor {
        HandlerDescriptor {
            name: "Probe",
            kind: HandlerKind::Command,
            requires_auth,
            allows_anonymous,
            parameter_shape: ModelShape::new(&[]),
            response_shape: ModelShape::new(&[]),
        }
    }

    fn identity() -> AccessIdentity {
        AccessIdentity::new("alice", "alice")
    }

    #[test]
    fn test_public_route_requires_anonymous_marker() {
        let d = descriptor(false, false);
        let id = identity();
        let denied = authorize(&d, Some(&id), RouteVisibility::Public);
        assert!(matches!(denied, Err(DispatchError::Forbidden)));
    }

    #[test]
    fn test_public_route_allows_marked_handler() {
        let d = descriptor(false, true);
        assert!(authorize(&d, None, RouteVisibility::Public).is_ok());
    }

    #[test]
    fn test_auth_required_without_identity_is_unauthorized() {
        let d = descriptor(true, false);
        let denied = authorize(&d, None, RouteVisibility::Private);
        assert!(matches!(denied, Err(DispatchError::Unauthorized)));
    }

    #[test]
    fn test_auth_required_with_identity_is_allowed() {
        let d = descriptor(true, false);
        let id = identity();
        assert!(authorize(&d, Some(&id), RouteVisibility::Private).is_ok());
    }

    #[test]
    fn test_checks_are_independent() {
        // 允许匿名且要求身份:public 路由 + 无身份仍然是 Unauthorized
        let d = descriptor(true, true);
        let denied = authorize(&d, None, RouteVisibility::Public);
        assert!(matches!(denied, Err(DispatchError::Unauthorized)));
    }
}
