//! 请求/结果信封
//!
//! 每次调用的统一包装:入站 RequestEnvelope,出站 ResultEnvelope。
//! 线格式沿用 PascalCase 字段名

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

/// 入站工作单元
///
/// 每次 HTTP 调用构造一个,从不持久化。
/// parameter 在描述符解析前保持无类型
#[derive(Debug, Clone, Deserialize)]
pub struct RequestEnvelope {
    /// 调用唯一标识,缺省时自动生成
    #[serde(rename = "RequestId", default = "new_request_id")]
    pub request_id: String,

    /// 路由键
    #[serde(rename = "RequestName")]
    pub request_name: String,

    /// 调用方发送时间
    #[serde(rename = "SentTime", default = "now")]
    pub sent_time: DateTime<Utc>,

    /// 服务端接收时间,由 Dispatcher 盖戳
    #[serde(skip, default = "now")]
    pub received_time: DateTime<Utc>,

    /// 无类型负载,形状在描述符解析后才确定
    #[serde(rename = "Parameter", default)]
    pub parameter: serde_json::Value,
}

impl RequestEnvelope {
    /// 为内部合成的调用构造信封(如 file/{id} 简写路由)
    pub fn synthesize(request_name: impl Into<String>, parameter: serde_json::Value) -> Self {
        Self {
            request_id: new_request_id(),
            request_name: request_name.into(),
            sent_time: Utc::now(),
            received_time: Utc::now(),
            parameter,
        }
    }
}

/// 失败类别,机器可读
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// 参数无法结构化匹配负载
    Binding,
    /// 参数校验失败,error 携带全部违规项
    Validation,
    /// 处理器执行期间抛出的任意错误
    Execution,
}

/// 出站工作单元
///
/// 不变量: success 为 true 时 result 有值,为 false 时 error 有值。
/// 构造后不再修改,原样返回给传输层
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultEnvelope {
    pub request_id: String,
    pub request_name: String,
    pub received_time: DateTime<Utc>,
    pub response_time: DateTime<Utc>,
    /// 从 received_time 到 response_time 的壁钟耗时
    pub response_duration_ms: i64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl ResultEnvelope {
    /// 成功信封
    pub fn success(request: &RequestEnvelope, result: serde_json::Value) -> Self {
        let response_time = Utc::now();
        Self {
            request_id: request.request_id.clone(),
            request_name: request.request_name.clone(),
            received_time: request.received_time,
            response_time,
            response_duration_ms: (response_time - request.received_time).num_milliseconds(),
            success: true,
            result: Some(result),
            error: None,
            error_kind: None,
        }
    }

    /// 失败信封
    pub fn failure(request: &RequestEnvelope, kind: ErrorKind, error: impl Into<String>) -> Self {
        let response_time = Utc::now();
        Self {
            request_id: request.request_id.clone(),
            request_name: request.request_name.clone(),
            received_time: request.received_time,
            response_time,
            response_duration_ms: (response_time - request.received_time).num_milliseconds(),
            success: false,
            result: None,
            error: Some(error.into()),
            error_kind: Some(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_id_generated_when_absent() {
        let envelope: RequestEnvelope =
            serde_json::from_value(json!({ "RequestName": "LogIn", "Parameter": {} })).unwrap();
        assert!(!envelope.request_id.is_empty());
        assert_eq!(envelope.request_name, "LogIn");
    }

    #[test]
    fn test_request_id_preserved_when_present() {
        let envelope: RequestEnvelope = serde_json::from_value(json!({
            "RequestId": "r-1",
            "RequestName": "GetContract",
            "Parameter": { "Id": "c-1" }
        }))
        .unwrap();
        assert_eq!(envelope.request_id, "r-1");
        assert_eq!(envelope.parameter["Id"], "c-1");
    }

    #[test]
    fn test_success_envelope_invariant() {
        let request = RequestEnvelope::synthesize("GetContract", json!({}));
        let result = ResultEnvelope::success(&request, json!({ "Id": "c-1" }));
        assert!(result.success);
        assert!(result.result.is_some());
        assert!(result.error.is_none());
        assert!(result.error_kind.is_none());
        assert!(result.response_duration_ms >= 0);
    }

    #[test]
    fn test_failure_envelope_invariant() {
        let request = RequestEnvelope::synthesize("GetContract", json!({}));
        let result = ResultEnvelope::failure(&request, ErrorKind::Execution, "boom");
        assert!(!result.success);
        assert!(result.result.is_none());
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert_eq!(result.error_kind, Some(ErrorKind::Execution));
    }

    #[test]
    fn test_result_envelope_wire_casing() {
        let request = RequestEnvelope::synthesize("LogIn", json!({}));
        let value = serde_json::to_value(ResultEnvelope::success(&request, json!(1))).unwrap();
        assert!(value.get("RequestName").is_some());
        assert!(value.get("Success").is_some());
        assert!(value.get("ResponseDurationMs").is_some());
        // 失败才有的字段不应出现
        assert!(value.get("Error").is_none());
    }
}
