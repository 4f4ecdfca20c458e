//! Command HTTP Handlers
//!
//! - POST /api/Command/Execute/{module}   执行命令
//! - POST /api/Command/Upload/{module}    multipart 执行(data + files)
//! - GET  /api/Command/ListAll/{module}   命令名列表
//! - GET  /api/Command/Detail/{module}/{name}  参数/响应形状

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::{dispatch_request, ApiRejection, AppState};
use crate::application::dispatch::{FormPayload, HandlerKind, RouteVisibility, UploadedFile};
use crate::application::envelope::RequestEnvelope;

/// 执行命令
pub async fn execute_command(
    State(state): State<Arc<AppState>>,
    Path(module): Path<String>,
    headers: HeaderMap,
    Json(envelope): Json<RequestEnvelope>,
) -> Response {
    dispatch_request(
        &state,
        &module,
        HandlerKind::Command,
        envelope,
        RouteVisibility::Private,
        &headers,
        None,
    )
    .await
}

/// multipart 执行命令
///
/// "data" 字段是 JSON 编码的请求信封,"files"/"file" 字段是二进制附件,
/// 附件不做 JSON 解析,原样并入绑定后的参数
pub async fn upload_command(
    State(state): State<Arc<AppState>>,
    Path(module): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut envelope: Option<RequestEnvelope> = None;
    let mut files = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read multipart field: {}", e),
                )
                    .into_response();
            }
        };

        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "data" => {
                let text = match field.text().await {
                    Ok(text) => text,
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read data field: {}", e),
                        )
                            .into_response();
                    }
                };
                envelope = match serde_json::from_str(&text) {
                    Ok(envelope) => Some(envelope),
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            format!("Invalid request envelope: {}", e),
                        )
                            .into_response();
                    }
                };
            }
            "files" | "file" => {
                let file_name = field.file_name().unwrap_or("unnamed").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = match field.bytes().await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read file field: {}", e),
                        )
                            .into_response();
                    }
                };
                files.push(UploadedFile {
                    field_name,
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let Some(envelope) = envelope else {
        return (
            StatusCode::BAD_REQUEST,
            "Multipart request requires a data field".to_string(),
        )
            .into_response();
    };

    dispatch_request(
        &state,
        &module,
        HandlerKind::Command,
        envelope,
        RouteVisibility::Private,
        &headers,
        Some(FormPayload { files }),
    )
    .await
}

/// 命令名列表
pub async fn list_commands(
    State(state): State<Arc<AppState>>,
    Path(module): Path<String>,
) -> Response {
    match state.registry.list_handlers(&module, HandlerKind::Command) {
        Ok(names) => Json(names).into_response(),
        Err(rejection) => ApiRejection(rejection).into_response(),
    }
}

/// 命令详情
pub async fn command_detail(
    State(state): State<Arc<AppState>>,
    Path((module, name)): Path<(String, String)>,
) -> Response {
    match state.registry.describe(&module, HandlerKind::Command, &name) {
        Ok(detail) => Json(detail).into_response(),
        Err(rejection) => ApiRejection(rejection).into_response(),
    }
}
