//! HTTP Routes
//!
//! API 路由定义
//!
//! API Endpoints:
//! - /api/Command/Execute/{module}        POST  执行命令
//! - /api/Command/Upload/{module}         POST  multipart 执行命令
//! - /api/Command/ListAll/{module}        GET   命令名列表
//! - /api/Command/Detail/{module}/{name}  GET   命令详情
//! - /api/Query/Execute/{module}          POST  执行查询
//! - /api/Query/ListAll/{module}          GET   查询名列表
//! - /api/Query/Detail/{module}/{name}    GET   查询详情
//! - /api/Query/download/{module}         POST  文件下载查询
//! - /api/Query/{module}/{name}/file/{id} GET   按 ID 下载简写
//! - /api/public/execute/{module}         POST  匿名执行
//! - /api/public/{module}/{name}/file/{id} GET  匿名按 ID 下载
//! - /api/ping                            GET   健康检查

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/Command", command_routes())
        .nest("/Query", query_routes())
        .nest("/public", public_routes())
}

/// Command 路由
fn command_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/Execute/:module", post(handlers::execute_command))
        .route("/Upload/:module", post(handlers::upload_command))
        .route("/ListAll/:module", get(handlers::list_commands))
        .route("/Detail/:module/:name", get(handlers::command_detail))
}

/// Query 路由
fn query_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/Execute/:module", post(handlers::execute_query))
        .route("/ListAll/:module", get(handlers::list_queries))
        .route("/Detail/:module/:name", get(handlers::query_detail))
        .route("/download/:module", post(handlers::download))
        .route("/:module/:request_name/file/:id", get(handlers::get_file))
}

/// Public 路由 - 匿名访问面
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/execute/:module", post(handlers::public_execute))
        .route(
            "/:module/:request_name/file/:id",
            get(handlers::public_get_file),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::application::build_registry;
    use crate::application::dispatch::Dispatcher;
    use crate::application::ports::{
        AttachmentRepositoryPort, AttachmentStoragePort, ContractRepositoryPort,
        PasswordHasherPort, TokenCodecPort, UserRepositoryPort,
    };
    use crate::application::services::AppServices;
    use crate::domain::{Attachment, Contract, User};
    use crate::infrastructure::auth::{Argon2PasswordHasher, HmacTokenCodec};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteAttachmentRepository,
        SqliteContractRepository, SqliteUserRepository,
    };
    use crate::infrastructure::storage::FileAttachmentStorage;

    async fn test_app() -> (Router, Arc<AppServices>) {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let dir = std::env::temp_dir().join(format!("pactum-http-test-{}", Uuid::new_v4()));

        let services = Arc::new(AppServices {
            users: Arc::new(SqliteUserRepository::new(pool.clone())),
            contracts: Arc::new(SqliteContractRepository::new(pool.clone())),
            attachments: Arc::new(SqliteAttachmentRepository::new(pool.clone())),
            attachment_storage: Arc::new(FileAttachmentStorage::new(&dir).await.unwrap()),
            token_codec: Arc::new(HmacTokenCodec::new("route-test-secret", 1800)),
            password_hasher: Arc::new(Argon2PasswordHasher::new()),
        });

        let registry = Arc::new(build_registry());
        let dispatcher = Dispatcher::new(registry.clone(), services.clone());
        let state = AppState::new(dispatcher, registry, services.token_codec.clone());
        let router = create_routes().with_state(Arc::new(state));

        (router, services)
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(Request::builder().uri("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_all_queries_excludes_commands() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/Query/ListAll/ADMIN")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let names = response_json(response).await;
        let names: Vec<&str> = names
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(names.contains(&"GetContract"));
        assert!(!names.contains(&"LogIn"));
    }

    #[tokio::test]
    async fn test_unknown_module_is_bad_request() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/Query/ListAll/BILLING")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_command_detail_exposes_shapes() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/Command/Detail/ADMIN/LogIn")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let detail = response_json(response).await;
        assert_eq!(detail["CommandName"], "LogIn");
        assert_eq!(detail["ParameterModel"]["UserName"], "String");
        assert_eq!(detail["ResponseModel"]["Token"], "String");
    }

    #[tokio::test]
    async fn test_execute_login_failure_is_envelope_400() {
        let (app, services) = test_app().await;
        let hashed = services.password_hasher.hash("right").unwrap();
        services
            .users
            .add(&User::new("alice", None, hashed))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "/api/Command/Execute/ADMIN",
                json!({
                    "RequestName": "LogIn",
                    "Parameter": { "UserName": "alice", "Password": "wrong" }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let envelope = response_json(response).await;
        assert_eq!(envelope["Success"], false);
        assert!(envelope["Error"]
            .as_str()
            .unwrap()
            .contains("Invalid username or password"));
    }

    #[tokio::test]
    async fn test_paged_query_requires_token() {
        let (app, services) = test_app().await;

        let anonymous = app
            .clone()
            .oneshot(json_request(
                "/api/Query/Execute/ADMIN",
                json!({
                    "RequestName": "GetByPagedContract",
                    "Parameter": { "PageNumber": 1, "PageSize": 10 }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let user = User::new("admin", None, "hash".to_string());
        let token = services.token_codec.issue(&user);
        let request = Request::builder()
            .method("POST")
            .uri("/api/Query/Execute/ADMIN")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(
                json!({
                    "RequestName": "GetByPagedContract",
                    "Parameter": { "PageNumber": 1, "PageSize": 10 }
                })
                .to_string(),
            ))
            .unwrap();

        let authed = app.oneshot(request).await.unwrap();
        assert_eq!(authed.status(), StatusCode::OK);

        let envelope = response_json(authed).await;
        assert_eq!(envelope["Success"], true);
        assert_eq!(envelope["Result"]["Count"], 0);
    }

    #[tokio::test]
    async fn test_public_route_rejects_private_handler() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(json_request(
                "/api/public/execute/ADMIN",
                json!({
                    "RequestName": "SaveContract",
                    "Parameter": { "Author": "a", "Name": "n" }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_public_login_is_reachable() {
        let (app, services) = test_app().await;
        let hashed = services.password_hasher.hash("secret-pass").unwrap();
        services
            .users
            .add(&User::new("bob", None, hashed))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "/api/public/execute/ADMIN",
                json!({
                    "RequestName": "LogIn",
                    "Parameter": { "UserName": "bob", "Password": "secret-pass" }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let envelope = response_json(response).await;
        assert_eq!(envelope["Success"], true);
    }

    #[tokio::test]
    async fn test_get_file_streams_attachment() {
        let (app, services) = test_app().await;

        let contract = Contract::new("alice", "NDA", "");
        services.contracts.add(&contract).await.unwrap();

        let mut attachment =
            Attachment::new(&contract.id, "scan.pdf", "application/pdf", 9, "");
        attachment.stored_path = services
            .attachment_storage
            .save(&attachment.id, b"pdf bytes")
            .await
            .unwrap();
        services.attachments.add(&attachment).await.unwrap();

        let uri = format!("/api/Query/ADMIN/GetContractFile/file/{}", attachment.id);
        let response = app
            .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"pdf bytes");
    }

    #[tokio::test]
    async fn test_get_file_for_missing_attachment_is_envelope_400() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/Query/ADMIN/GetContractFile/file/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let envelope = response_json(response).await;
        assert_eq!(envelope["Success"], false);
    }
}
