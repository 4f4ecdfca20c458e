//! Password Hasher Port - 口令哈希

/// 口令哈希端口
pub trait PasswordHasherPort: Send + Sync {
    /// 生成带盐哈希
    fn hash(&self, password: &str) -> Result<String, anyhow::Error>;

    /// 校验明文口令与存储哈希
    fn verify(&self, password: &str, hashed: &str) -> bool;
}
