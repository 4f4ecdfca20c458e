//! Auth Adapters - 凭证编解码与口令哈希实现

mod password;
mod token;

pub use password::Argon2PasswordHasher;
pub use token::HmacTokenCodec;
