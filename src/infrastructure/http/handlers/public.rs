//! Public HTTP Handlers - 匿名访问面
//!
//! 与私有路由同样的 execute/file 操作,但授权门规则 1 生效:
//! 只有显式允许匿名的处理器可以到达

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use super::query::dispatch_file;
use super::{dispatch_request, AppState};
use crate::application::dispatch::{DispatchError, HandlerKind, RouteVisibility};
use crate::application::envelope::RequestEnvelope;
use crate::infrastructure::http::error::ApiRejection;
use axum::response::IntoResponse;

/// 匿名执行
///
/// public 面不区分命令/查询路由,先按 Command 解析,
/// 未命中再按 Query 解析
pub async fn public_execute(
    State(state): State<Arc<AppState>>,
    Path(module): Path<String>,
    headers: HeaderMap,
    Json(envelope): Json<RequestEnvelope>,
) -> Response {
    let resolved_as_command = state
        .registry
        .describe(&module, HandlerKind::Command, &envelope.request_name)
        .is_ok();

    let kind = if resolved_as_command {
        HandlerKind::Command
    } else {
        match state
            .registry
            .describe(&module, HandlerKind::Query, &envelope.request_name)
        {
            Ok(_) => HandlerKind::Query,
            Err(DispatchError::InvalidModule(name)) => {
                return ApiRejection(DispatchError::InvalidModule(name)).into_response();
            }
            Err(_) => {
                return ApiRejection(DispatchError::HandlerNotFound {
                    module,
                    name: envelope.request_name,
                })
                .into_response();
            }
        }
    };

    dispatch_request(
        &state,
        &module,
        kind,
        envelope,
        RouteVisibility::Public,
        &headers,
        None,
    )
    .await
}

/// 匿名按 ID 下载
pub async fn public_get_file(
    State(state): State<Arc<AppState>>,
    Path((module, request_name, id)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    let envelope = RequestEnvelope::synthesize(request_name, json!({ "Id": id }));
    dispatch_file(&state, &module, envelope, RouteVisibility::Public, &headers).await
}
