//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级(从高到低):
//! 1. 环境变量
//! 2. 配置文件(config.toml)
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置:
/// 1. 环境变量(前缀 `PACTUM_`,层级分隔符 `__`)
/// 2. 配置文件(config.toml 或 config.local.toml)
/// 3. 默认值
///
/// # 环境变量示例
/// - `PACTUM_SERVER__HOST=127.0.0.1`
/// - `PACTUM_SERVER__PORT=8080`
/// - `PACTUM_DATABASE__PATH=/data/pactum.db`
/// - `PACTUM_AUTH__TOKEN_SECRET=...`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径,如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值(最低优先级)
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5080)?
        .set_default("database.path", "data/pactum.db")?
        .set_default("database.max_connections", 5)?
        .set_default("auth.token_secret", "pactum-dev-secret")?
        .set_default("auth.token_ttl_secs", 1800)?
        .set_default("storage.attachments_dir", "data/attachments")?
        .set_default("storage.max_upload_size", 50 * 1024 * 1024)?
        .set_default("seed.enabled", true)?
        .set_default("seed.admin_username", "admin")?
        .set_default("seed.admin_password", "ChangeMe123")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件(如果存在)
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量(最高优先级)
    // 前缀: PACTUM_,层级分隔符: __ (双下划线)
    // 例如: PACTUM_AUTH__TOKEN_SECRET=prod-secret
    builder = builder.add_source(
        Environment::with_prefix("PACTUM")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.auth.token_secret.is_empty() {
        return Err(ConfigError::ValidationError(
            "Auth token secret cannot be empty".to_string(),
        ));
    }

    if config.auth.token_ttl_secs <= 0 {
        return Err(ConfigError::ValidationError(
            "Auth token TTL must be positive".to_string(),
        ));
    }

    if config.seed.enabled && config.seed.admin_username.is_empty() {
        return Err(ConfigError::ValidationError(
            "Seed admin username cannot be empty when seeding is enabled".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息(用于启动时日志)
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!("Token TTL: {}s", config.auth.token_ttl_secs);
    tracing::info!("Attachments Directory: {:?}", config.storage.attachments_dir);
    tracing::info!("Max Upload Size: {} bytes", config.storage.max_upload_size);
    tracing::info!("Seeding Enabled: {}", config.seed.enabled);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
