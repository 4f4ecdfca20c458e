//! SQLite Persistence - 数据库连接、迁移与仓储实现

mod attachment_repo;
mod contract_repo;
mod database;
mod user_repo;

pub use attachment_repo::SqliteAttachmentRepository;
pub use contract_repo::SqliteContractRepository;
pub use database::{create_pool, run_migrations, DatabaseConfig, DbPool};
pub use user_repo::SqliteUserRepository;
