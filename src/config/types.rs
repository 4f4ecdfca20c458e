//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 凭证配置
    #[serde(default)]
    pub auth: AuthConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 数据初始化配置
    #[serde(default)]
    pub seed: SeedConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/pactum.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 凭证配置
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC 签名密钥,生产环境必须覆盖
    #[serde(default = "default_token_secret")]
    pub token_secret: String,

    /// 凭证有效期(秒)
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: i64,
}

fn default_token_secret() -> String {
    "pactum-dev-secret".to_string()
}

fn default_token_ttl() -> i64 {
    1800 // 30 分钟
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            token_ttl_secs: default_token_ttl(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 附件存储目录
    #[serde(default = "default_attachments_dir")]
    pub attachments_dir: PathBuf,

    /// 上传请求体最大大小(字节)
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_attachments_dir() -> PathBuf {
    PathBuf::from("data/attachments")
}

fn default_max_upload_size() -> u64 {
    50 * 1024 * 1024 // 50 MB
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            attachments_dir: default_attachments_dir(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 数据初始化配置
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// 是否在启动时写入缺省管理员
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,

    /// 管理员用户名
    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    /// 管理员初始口令
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

fn default_seed_enabled() -> bool {
    true
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "ChangeMe123".to_string()
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_seed_enabled(),
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5080);
        assert_eq!(config.database.path, "data/pactum.db");
        assert_eq!(config.auth.token_ttl_secs, 1800);
        assert!(config.seed.enabled);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5080");
    }

    #[test]
    fn test_database_url() {
        let config = DatabaseConfig::default();
        assert_eq!(config.database_url(), "sqlite:data/pactum.db?mode=rwc");
    }
}
