//! HTTP Error Handling
//!
//! 调度前置拒绝映射为纯文本状态码响应;结果信封按 success
//! 映射 200/400,信封本身原样作为响应体

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::dispatch::DispatchError;
use crate::application::envelope::ResultEnvelope;

/// 调度前置拒绝的 HTTP 包装
pub struct ApiRejection(pub DispatchError);

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DispatchError::InvalidModule(_) | DispatchError::HandlerNotFound { .. } => {
                StatusCode::BAD_REQUEST
            }
            DispatchError::Unauthorized => StatusCode::UNAUTHORIZED,
            DispatchError::Forbidden => StatusCode::FORBIDDEN,
        };

        tracing::warn!(status = status.as_u16(), error = %self.0, "Request rejected");

        (status, self.0.to_string()).into_response()
    }
}

/// 结果信封响应: 成功 200,失败 400,信封都是响应体
pub fn envelope_response(result: ResultEnvelope) -> Response {
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(result)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::envelope::{ErrorKind, RequestEnvelope};
    use serde_json::json;

    #[test]
    fn test_rejection_status_codes() {
        let forbidden = ApiRejection(DispatchError::Forbidden).into_response();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let unauthorized = ApiRejection(DispatchError::Unauthorized).into_response();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

        let invalid = ApiRejection(DispatchError::InvalidModule("X".to_string())).into_response();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_envelope_status_tracks_success() {
        let request = RequestEnvelope::synthesize("LogIn", json!({}));

        let ok = envelope_response(ResultEnvelope::success(&request, json!(1)));
        assert_eq!(ok.status(), StatusCode::OK);

        let failed = envelope_response(ResultEnvelope::failure(
            &request,
            ErrorKind::Execution,
            "boom",
        ));
        assert_eq!(failed.status(), StatusCode::BAD_REQUEST);
    }
}
