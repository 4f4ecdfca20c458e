//! Query HTTP Handlers
//!
//! - POST /api/Query/Execute/{module}     执行查询
//! - GET  /api/Query/ListAll/{module}     查询名列表
//! - GET  /api/Query/Detail/{module}/{name}  参数/响应形状
//! - POST /api/Query/download/{module}    文件下载(信封同 Execute)
//! - GET  /api/Query/{module}/{requestName}/file/{id}  按 ID 下载简写

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::{bearer_identity, dispatch_request, file_response, ApiRejection, AppState};
use crate::application::dispatch::{Dispatched, HandlerKind, RouteVisibility};
use crate::application::envelope::RequestEnvelope;
use crate::infrastructure::http::error::envelope_response;

/// 执行查询
pub async fn execute_query(
    State(state): State<Arc<AppState>>,
    Path(module): Path<String>,
    headers: HeaderMap,
    Json(envelope): Json<RequestEnvelope>,
) -> Response {
    dispatch_request(
        &state,
        &module,
        HandlerKind::Query,
        envelope,
        RouteVisibility::Private,
        &headers,
        None,
    )
    .await
}

/// 查询名列表
pub async fn list_queries(
    State(state): State<Arc<AppState>>,
    Path(module): Path<String>,
) -> Response {
    match state.registry.list_handlers(&module, HandlerKind::Query) {
        Ok(names) => Json(names).into_response(),
        Err(rejection) => ApiRejection(rejection).into_response(),
    }
}

/// 查询详情
pub async fn query_detail(
    State(state): State<Arc<AppState>>,
    Path((module, name)): Path<(String, String)>,
) -> Response {
    match state.registry.describe(&module, HandlerKind::Query, &name) {
        Ok(detail) => Json(detail).into_response(),
        Err(rejection) => ApiRejection(rejection).into_response(),
    }
}

/// 文件下载查询
///
/// 只有产生文件变体的处理器在这里有意义;
/// 返回 JSON 的处理器会被拒绝
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(module): Path<String>,
    headers: HeaderMap,
    Json(envelope): Json<RequestEnvelope>,
) -> Response {
    dispatch_file(&state, &module, envelope, RouteVisibility::Private, &headers).await
}

/// 按 ID 下载简写,合成 {"RequestName": name, "Parameter": {"Id": id}} 信封
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path((module, request_name, id)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    let envelope = RequestEnvelope::synthesize(request_name, json!({ "Id": id }));
    dispatch_file(&state, &module, envelope, RouteVisibility::Private, &headers).await
}

/// 期望文件变体的调度
pub(super) async fn dispatch_file(
    state: &AppState,
    module: &str,
    envelope: RequestEnvelope,
    visibility: RouteVisibility,
    headers: &HeaderMap,
) -> Response {
    let identity = bearer_identity(state, headers);
    let cancel = CancellationToken::new();

    match state
        .dispatcher
        .dispatch(
            module,
            HandlerKind::Query,
            envelope,
            visibility,
            identity,
            None,
            cancel,
        )
        .await
    {
        Ok(Dispatched::File(file)) => file_response(file),
        Ok(Dispatched::Envelope(result)) if !result.success => envelope_response(result),
        Ok(Dispatched::Envelope(_)) => (
            StatusCode::BAD_REQUEST,
            "Handler did not produce a file response".to_string(),
        )
            .into_response(),
        Err(rejection) => ApiRejection(rejection).into_response(),
    }
}
