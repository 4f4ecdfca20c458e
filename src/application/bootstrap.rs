//! 模块引导 - 显式处理器注册表
//!
//! 反射扫描在这里被一张编译期检查的注册表取代:每个处理器
//! 由所属模块的引导函数登记一次,名字到类型的映射静态可查。
//! 注册发生在服务请求之前的单线程初始化屏障内

use crate::application::commands::{
    ChangePasswordCommandHandler, DeleteContractCommandHandler, DeleteUserCommandHandler,
    EditUserCommandHandler, LogInCommandHandler, RegistrationCommandHandler,
    SaveContractCommandHandler, UploadContractFileCommandHandler,
};
use crate::application::dispatch::{ModuleRegistry, RegistryBuilder};
use crate::application::queries::{
    GetAllContractQueryHandler, GetByPagedContractQueryHandler, GetContractFileQueryHandler,
    GetContractQueryHandler,
};
use crate::application::services::AppServices;
use crate::domain::Module;

/// 构建进程级注册表
pub fn build_registry() -> ModuleRegistry {
    let mut builder = ModuleRegistry::builder();
    register_admin_handlers(&mut builder);
    builder.freeze()
}

/// ADMIN 模块的处理器注册表
pub fn register_admin_handlers(builder: &mut RegistryBuilder) {
    builder
        .register::<LogInCommandHandler, _>(Module::Admin, |s: &AppServices| {
            LogInCommandHandler::new(
                s.users.clone(),
                s.token_codec.clone(),
                s.password_hasher.clone(),
            )
        })
        .register::<RegistrationCommandHandler, _>(Module::Admin, |s: &AppServices| {
            RegistrationCommandHandler::new(
                s.users.clone(),
                s.token_codec.clone(),
                s.password_hasher.clone(),
            )
        })
        .register::<ChangePasswordCommandHandler, _>(Module::Admin, |s: &AppServices| {
            ChangePasswordCommandHandler::new(s.users.clone(), s.password_hasher.clone())
        })
        .register::<EditUserCommandHandler, _>(Module::Admin, |s: &AppServices| {
            EditUserCommandHandler::new(s.users.clone())
        })
        .register::<DeleteUserCommandHandler, _>(Module::Admin, |s: &AppServices| {
            DeleteUserCommandHandler::new(s.users.clone())
        })
        .register::<SaveContractCommandHandler, _>(Module::Admin, |s: &AppServices| {
            SaveContractCommandHandler::new(s.contracts.clone())
        })
        .register::<DeleteContractCommandHandler, _>(Module::Admin, |s: &AppServices| {
            DeleteContractCommandHandler::new(s.contracts.clone())
        })
        .register::<UploadContractFileCommandHandler, _>(Module::Admin, |s: &AppServices| {
            UploadContractFileCommandHandler::new(
                s.contracts.clone(),
                s.attachments.clone(),
                s.attachment_storage.clone(),
            )
        })
        .register::<GetContractQueryHandler, _>(Module::Admin, |s: &AppServices| {
            GetContractQueryHandler::new(s.contracts.clone())
        })
        .register::<GetAllContractQueryHandler, _>(Module::Admin, |s: &AppServices| {
            GetAllContractQueryHandler::new(s.contracts.clone())
        })
        .register::<GetByPagedContractQueryHandler, _>(Module::Admin, |s: &AppServices| {
            GetByPagedContractQueryHandler::new(s.contracts.clone())
        })
        .register::<GetContractFileQueryHandler, _>(Module::Admin, |s: &AppServices| {
            GetContractFileQueryHandler::new(s.attachments.clone(), s.attachment_storage.clone())
        });
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;
    use tokio_util::sync::CancellationToken;
    use uuid::Uuid;

    use super::*;
    use crate::application::dispatch::{
        Dispatched, Dispatcher, DispatchError, ExecutionContext, HandlerKind, RequestHandler,
        RouteVisibility,
    };
    use crate::application::envelope::{ErrorKind, RequestEnvelope};
    use crate::application::identity::AccessIdentity;
    use crate::application::params::GetItemsParameter;
    use crate::application::ports::ContractRepositoryPort;
    use crate::application::responses::EmptyResponse;
    use crate::domain::Contract;
    use crate::infrastructure::auth::{Argon2PasswordHasher, HmacTokenCodec};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteAttachmentRepository,
        SqliteContractRepository, SqliteUserRepository,
    };
    use crate::infrastructure::storage::FileAttachmentStorage;

    async fn services() -> Arc<AppServices> {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let dir = std::env::temp_dir().join(format!("pactum-test-{}", Uuid::new_v4()));
        let storage = FileAttachmentStorage::new(&dir).await.unwrap();

        Arc::new(AppServices {
            users: Arc::new(SqliteUserRepository::new(pool.clone())),
            contracts: Arc::new(SqliteContractRepository::new(pool.clone())),
            attachments: Arc::new(SqliteAttachmentRepository::new(pool.clone())),
            attachment_storage: Arc::new(storage),
            token_codec: Arc::new(HmacTokenCodec::new("test-secret", 1800)),
            password_hasher: Arc::new(Argon2PasswordHasher::new()),
        })
    }

    fn dispatcher(services: Arc<AppServices>) -> Dispatcher {
        Dispatcher::new(Arc::new(build_registry()), services)
    }

    fn envelope(name: &str, parameter: serde_json::Value) -> RequestEnvelope {
        RequestEnvelope::synthesize(name, parameter)
    }

    fn identity() -> AccessIdentity {
        AccessIdentity::new("admin", "admin")
    }

    async fn dispatch_json(
        dispatcher: &Dispatcher,
        kind: HandlerKind,
        request: RequestEnvelope,
        identity: Option<AccessIdentity>,
    ) -> crate::application::envelope::ResultEnvelope {
        let dispatched = dispatcher
            .dispatch(
                "ADMIN",
                kind,
                request,
                RouteVisibility::Private,
                identity,
                None,
                CancellationToken::new(),
            )
            .await
            .unwrap();
        match dispatched {
            Dispatched::Envelope(result) => result,
            Dispatched::File(_) => panic!("expected a json envelope"),
        }
    }

    async fn register_user(dispatcher: &Dispatcher, username: &str, password: &str) {
        let result = dispatch_json(
            dispatcher,
            HandlerKind::Command,
            envelope(
                "Registration",
                json!({ "UserName": username, "Password": password }),
            ),
            None,
        )
        .await;
        assert!(result.success, "registration failed: {:?}", result.error);
    }

    // ------------------------------------------------------------------
    // 场景测试
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_with_wrong_password_fails() {
        let services = services().await;
        let dispatcher = dispatcher(services);
        register_user(&dispatcher, "alice", "correct-horse").await;

        let result = dispatch_json(
            &dispatcher,
            HandlerKind::Command,
            envelope("LogIn", json!({ "UserName": "alice", "Password": "wrong" })),
            None,
        )
        .await;

        assert!(!result.success);
        assert!(result
            .error
            .as_deref()
            .unwrap()
            .contains("Invalid username or password"));
        assert_eq!(result.error_kind, Some(ErrorKind::Execution));
    }

    #[tokio::test]
    async fn test_login_with_correct_password_returns_token() {
        let services = services().await;
        let dispatcher = dispatcher(services);
        register_user(&dispatcher, "alice", "correct-horse").await;

        let result = dispatch_json(
            &dispatcher,
            HandlerKind::Command,
            envelope("LogIn", json!({ "UserName": "alice", "Password": "correct-horse" })),
            None,
        )
        .await;

        assert!(result.success);
        let token = result.result.unwrap()["Token"].as_str().unwrap().to_string();
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn test_paged_contracts_with_three_rows() {
        let services = services().await;
        for i in 0..3 {
            services
                .contracts
                .add(&Contract::new("author", format!("contract-{}", i), ""))
                .await
                .unwrap();
        }
        let dispatcher = dispatcher(services);

        let result = dispatch_json(
            &dispatcher,
            HandlerKind::Query,
            envelope("GetByPagedContract", json!({ "PageNumber": 1, "PageSize": 10 })),
            Some(identity()),
        )
        .await;

        assert!(result.success);
        let body = result.result.unwrap();
        assert_eq!(body["Count"], 3);
        assert_eq!(body["TotalPage"], 1);
        assert_eq!(body["Data"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_missing_contract_mutates_nothing() {
        let services = services().await;
        services
            .contracts
            .add(&Contract::new("author", "keep-me", ""))
            .await
            .unwrap();
        let dispatcher = dispatcher(services.clone());

        let result = dispatch_json(
            &dispatcher,
            HandlerKind::Command,
            envelope("DeleteContract", json!({ "Id": "missing-id" })),
            None,
        )
        .await;

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("not found"));
        assert_eq!(services.contracts.get_all(false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_two_handler_registry_query_listing() {
        let mut builder = ModuleRegistry::builder();
        builder
            .register::<LogInCommandHandler, _>(Module::Admin, |s: &AppServices| {
                LogInCommandHandler::new(
                    s.users.clone(),
                    s.token_codec.clone(),
                    s.password_hasher.clone(),
                )
            })
            .register::<GetContractQueryHandler, _>(Module::Admin, |s: &AppServices| {
                GetContractQueryHandler::new(s.contracts.clone())
            });
        let registry = builder.freeze();

        assert_eq!(
            registry.list_handlers("ADMIN", HandlerKind::Query).unwrap(),
            vec!["GetContract".to_string()]
        );
    }

    #[tokio::test]
    async fn test_query_listing_excludes_commands() {
        let registry = build_registry();
        let queries = registry.list_handlers("ADMIN", HandlerKind::Query).unwrap();
        assert!(queries.contains(&"GetContract".to_string()));
        assert!(!queries.contains(&"LogIn".to_string()));
        assert!(!queries.contains(&"SaveContract".to_string()));

        let commands = registry.list_handlers("ADMIN", HandlerKind::Command).unwrap();
        assert!(commands.contains(&"LogIn".to_string()));
        assert!(!commands.contains(&"GetContract".to_string()));
    }

    // ------------------------------------------------------------------
    // 注册表性质
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_registration_is_idempotent() {
        let mut builder = ModuleRegistry::builder();
        register_admin_handlers(&mut builder);
        register_admin_handlers(&mut builder);
        let registry = builder.freeze();

        let commands = registry.list_handlers("ADMIN", HandlerKind::Command).unwrap();
        let login_count = commands.iter().filter(|n| n.as_str() == "LogIn").count();
        assert_eq!(login_count, 1);
    }

    #[tokio::test]
    async fn test_every_registered_name_resolves_exactly_once() {
        let registry = build_registry();
        for kind in [HandlerKind::Command, HandlerKind::Query] {
            for name in registry.list_handlers("ADMIN", kind).unwrap() {
                let detail = registry.describe("ADMIN", kind, &name).unwrap();
                assert_eq!(detail.command_name, name);
            }
        }
    }

    #[tokio::test]
    async fn test_describe_matches_declared_shape() {
        let registry = build_registry();
        let detail = registry
            .describe("ADMIN", HandlerKind::Query, "GetByPagedContract")
            .unwrap();
        assert_eq!(detail.parameter_model.get("PageNumber").unwrap(), "Int32");
        assert_eq!(detail.parameter_model.get("PageSize").unwrap(), "Int32");
        assert!(detail.response_model.contains_key("TotalPage"));
    }

    #[tokio::test]
    async fn test_unknown_module_is_rejected() {
        let registry = build_registry();
        assert!(matches!(
            registry.list_handlers("BILLING", HandlerKind::Command),
            Err(DispatchError::InvalidModule(_))
        ));
        // SHOP 可解析但没有任何引导代码登记过,同样视为 InvalidModule
        assert!(matches!(
            registry.list_handlers("SHOP", HandlerKind::Command),
            Err(DispatchError::InvalidModule(_))
        ));
    }

    // ------------------------------------------------------------------
    // 调度编排
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_dispatch_against_unknown_module_is_rejected() {
        let dispatcher = dispatcher(services().await);
        let rejected = dispatcher
            .dispatch(
                "BILLING",
                HandlerKind::Command,
                envelope("LogIn", json!({ "UserName": "a", "Password": "b" })),
                RouteVisibility::Private,
                None,
                None,
                CancellationToken::new(),
            )
            .await;
        assert!(matches!(rejected, Err(DispatchError::InvalidModule(_))));
    }

    #[tokio::test]
    async fn test_unknown_request_name_is_handler_not_found() {
        let dispatcher = dispatcher(services().await);
        let rejected = dispatcher
            .dispatch(
                "ADMIN",
                HandlerKind::Command,
                envelope("Nonexistent", json!({})),
                RouteVisibility::Private,
                None,
                None,
                CancellationToken::new(),
            )
            .await;
        assert!(matches!(rejected, Err(DispatchError::HandlerNotFound { .. })));
    }

    #[tokio::test]
    async fn test_kind_filter_hides_commands_from_query_route() {
        let dispatcher = dispatcher(services().await);
        let rejected = dispatcher
            .dispatch(
                "ADMIN",
                HandlerKind::Query,
                envelope("LogIn", json!({ "UserName": "a", "Password": "b" })),
                RouteVisibility::Private,
                None,
                None,
                CancellationToken::new(),
            )
            .await;
        assert!(matches!(rejected, Err(DispatchError::HandlerNotFound { .. })));
    }

    #[tokio::test]
    async fn test_auth_required_handler_rejects_anonymous_call() {
        let dispatcher = dispatcher(services().await);
        let rejected = dispatcher
            .dispatch(
                "ADMIN",
                HandlerKind::Query,
                envelope("GetByPagedContract", json!({ "PageNumber": 1, "PageSize": 10 })),
                RouteVisibility::Private,
                None,
                None,
                CancellationToken::new(),
            )
            .await;
        assert!(matches!(rejected, Err(DispatchError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_public_route_rejects_non_anonymous_handler() {
        let dispatcher = dispatcher(services().await);
        let rejected = dispatcher
            .dispatch(
                "ADMIN",
                HandlerKind::Command,
                envelope("SaveContract", json!({ "Author": "a", "Name": "n" })),
                RouteVisibility::Public,
                Some(identity()),
                None,
                CancellationToken::new(),
            )
            .await;
        assert!(matches!(rejected, Err(DispatchError::Forbidden)));
    }

    #[tokio::test]
    async fn test_binding_failure_produces_failure_envelope() {
        let dispatcher = dispatcher(services().await);
        let result = dispatch_json(
            &dispatcher,
            HandlerKind::Command,
            envelope("LogIn", json!([1, 2, 3])),
            None,
        )
        .await;
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::Binding));
    }

    #[tokio::test]
    async fn test_missing_parameter_is_binding_failure() {
        let dispatcher = dispatcher(services().await);
        let result = dispatch_json(
            &dispatcher,
            HandlerKind::Command,
            envelope("LogIn", serde_json::Value::Null),
            None,
        )
        .await;
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::Binding));
        assert!(result.error.as_deref().unwrap().contains("Parameter"));
    }

    #[tokio::test]
    async fn test_cancelled_call_fails_without_executing() {
        let dispatcher = dispatcher(services().await);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let dispatched = dispatcher
            .dispatch(
                "ADMIN",
                HandlerKind::Query,
                envelope("GetAllContract", json!({})),
                RouteVisibility::Private,
                None,
                None,
                cancel,
            )
            .await
            .unwrap();

        match dispatched {
            Dispatched::Envelope(result) => {
                assert!(!result.success);
                assert!(result.error.as_deref().unwrap().contains("cancelled"));
            }
            Dispatched::File(_) => panic!("expected envelope"),
        }
    }

    // ------------------------------------------------------------------
    // 校验失败时处理器从未被调用
    // ------------------------------------------------------------------

    struct ProbeCommandHandler {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RequestHandler for ProbeCommandHandler {
        const NAME: &'static str = "Probe";
        const KIND: HandlerKind = HandlerKind::Command;

        type Param = GetItemsParameter;
        type Response = EmptyResponse;

        async fn execute(
            &self,
            _param: Self::Param,
            _ctx: &ExecutionContext,
        ) -> anyhow::Result<EmptyResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(EmptyResponse {})
        }
    }

    #[tokio::test]
    async fn test_validation_failure_never_invokes_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let probe_calls = calls.clone();

        let mut builder = ModuleRegistry::builder();
        builder.register::<ProbeCommandHandler, _>(Module::Admin, move |_s: &AppServices| {
            ProbeCommandHandler {
                calls: probe_calls.clone(),
            }
        });
        let dispatcher = Dispatcher::new(Arc::new(builder.freeze()), services().await);

        let result = dispatch_json(
            &dispatcher,
            HandlerKind::Command,
            envelope("Probe", json!({ "PageNumber": 0, "PageSize": 0 })),
            None,
        )
        .await;

        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::Validation));
        // 两条违规都要带上
        let error = result.error.unwrap();
        assert!(error.contains("PageNumber"));
        assert!(error.contains("PageSize"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_parameter_reaches_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let probe_calls = calls.clone();

        let mut builder = ModuleRegistry::builder();
        builder.register::<ProbeCommandHandler, _>(Module::Admin, move |_s: &AppServices| {
            ProbeCommandHandler {
                calls: probe_calls.clone(),
            }
        });
        let dispatcher = Dispatcher::new(Arc::new(builder.freeze()), services().await);

        let result = dispatch_json(
            &dispatcher,
            HandlerKind::Command,
            envelope("Probe", json!({ "PageNumber": 1, "PageSize": 10 })),
            None,
        )
        .await;

        assert!(result.success);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
