//! Pactum - 用户/合同管理后台
//!
//! 启动顺序: 配置 -> 日志 -> 数据库 -> 服务容器 -> 注册表(冻结)
//! -> 数据初始化 -> HTTP 服务。注册表在服务请求之前构建完成,
//! 之后只读

use std::sync::Arc;

use pactum::application::dispatch::Dispatcher;
use pactum::application::{build_registry, AppServices};
use pactum::config::{load_config, print_config};
use pactum::infrastructure::auth::{Argon2PasswordHasher, HmacTokenCodec};
use pactum::infrastructure::http::{AppState, HttpServer, ServerConfig};
use pactum::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteAttachmentRepository,
    SqliteContractRepository, SqliteUserRepository,
};
use pactum::infrastructure::seed::seed_admin_user;
use pactum::infrastructure::storage::FileAttachmentStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置(优先级: 环境变量 > 配置文件 > 默认值)
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!("{},pactum={},tower_http=debug", config.log.level, config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Pactum - administration backend");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 组装服务容器
    let services = Arc::new(AppServices {
        users: Arc::new(SqliteUserRepository::new(pool.clone())),
        contracts: Arc::new(SqliteContractRepository::new(pool.clone())),
        attachments: Arc::new(SqliteAttachmentRepository::new(pool.clone())),
        attachment_storage: Arc::new(
            FileAttachmentStorage::new(&config.storage.attachments_dir).await?,
        ),
        token_codec: Arc::new(HmacTokenCodec::new(
            &config.auth.token_secret,
            config.auth.token_ttl_secs,
        )),
        password_hasher: Arc::new(Argon2PasswordHasher::new()),
    });

    // 构建并冻结注册表 - 单线程初始化屏障,服务请求之前完成
    let registry = Arc::new(build_registry());

    // 缺省管理员
    seed_admin_user(&services, &config.seed).await?;

    // 创建 HTTP 服务器
    let token_codec = services.token_codec.clone();
    let dispatcher = Dispatcher::new(registry.clone(), services);
    let state = AppState::new(dispatcher, registry, token_codec);

    let server_config = ServerConfig::new(
        &config.server.host,
        config.server.port,
        config.storage.max_upload_size as usize,
    );
    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器(带优雅关闭)
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
