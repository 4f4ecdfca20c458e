//! HTTP Handlers

mod command;
mod ping;
mod public;
mod query;

pub use command::*;
pub use ping::*;
pub use public::*;
pub use query::*;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;

use super::error::{envelope_response, ApiRejection};
use super::state::AppState;
use crate::application::dispatch::{
    Dispatched, FileResponse, FormPayload, HandlerKind, RouteVisibility,
};
use crate::application::envelope::RequestEnvelope;
use crate::application::identity::AccessIdentity;
use crate::application::ports::TokenCodecPort;

/// 从 Authorization 头解码调用方身份,缺失/无效一律匿名
pub(super) fn bearer_identity(state: &AppState, headers: &HeaderMap) -> Option<AccessIdentity> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| state.token_codec.decode(value))
}

/// 调度一次调用并转成 HTTP 响应
pub(super) async fn dispatch_request(
    state: &AppState,
    module: &str,
    kind: HandlerKind,
    envelope: RequestEnvelope,
    visibility: RouteVisibility,
    headers: &HeaderMap,
    form: Option<FormPayload>,
) -> Response {
    let identity = bearer_identity(state, headers);
    let cancel = CancellationToken::new();

    match state
        .dispatcher
        .dispatch(module, kind, envelope, visibility, identity, form, cancel)
        .await
    {
        Ok(Dispatched::Envelope(result)) => envelope_response(result),
        Ok(Dispatched::File(file)) => file_response(file),
        Err(rejection) => ApiRejection(rejection).into_response(),
    }
}

/// 文件变体直接流式输出,不经过序列化的结果信封
pub(super) fn file_response(file: FileResponse) -> Response {
    let stream = ReaderStream::new(file.body);
    let mut response = Body::from_stream(stream).into_response();

    let content_type = HeaderValue::from_str(&file.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    response.headers_mut().insert(CONTENT_TYPE, content_type);

    if let Ok(disposition) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file.file_name))
    {
        response.headers_mut().insert(CONTENT_DISPOSITION, disposition);
    }

    response
}
