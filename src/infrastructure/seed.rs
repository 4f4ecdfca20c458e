//! Data Seeding - 启动期数据初始化
//!
//! 幂等地写入缺省管理员账户;已存在时什么都不做

use crate::application::ports::{PasswordHasherPort, UserRepositoryPort};
use crate::application::services::AppServices;
use crate::config::SeedConfig;
use crate::domain::User;

/// 写入缺省管理员账户
pub async fn seed_admin_user(services: &AppServices, config: &SeedConfig) -> anyhow::Result<()> {
    if !config.enabled {
        return Ok(());
    }

    if services.users.get(&config.admin_username).await?.is_some() {
        tracing::debug!(username = %config.admin_username, "Admin user already seeded");
        return Ok(());
    }

    let hashed = services.password_hasher.hash(&config.admin_password)?;
    let mut admin = User::new(
        config.admin_username.clone(),
        Some("Administrator".to_string()),
        hashed,
    );
    admin.is_system_admin = true;

    services.users.add(&admin).await?;

    tracing::info!(username = %admin.username, "Admin user seeded");

    Ok(())
}
