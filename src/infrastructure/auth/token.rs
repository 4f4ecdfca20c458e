//! HMAC Token Codec - 访问凭证实现
//!
//! 凭证格式: base64url(claims JSON) + "." + base64url(HMAC-SHA256 标签)。
//! decode 对缺失/畸形/签名不符/过期的凭证一律返回 None,
//! 调用链上把 None 当作匿名处理

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use ring::hmac;
use serde::{Deserialize, Serialize};

use crate::application::identity::AccessIdentity;
use crate::application::ports::TokenCodecPort;
use crate::domain::User;

/// 凭证声明,字段命名与身份负载保持 PascalCase
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    #[serde(rename = "UserId")]
    user_id: String,
    #[serde(rename = "UserName")]
    user_name: String,
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "IsAdmin", default)]
    is_admin: bool,
    #[serde(rename = "Exp")]
    exp: i64,
}

/// HMAC-SHA256 签名的凭证编解码器
pub struct HmacTokenCodec {
    key: hmac::Key,
    ttl_secs: i64,
}

impl HmacTokenCodec {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes()),
            ttl_secs,
        }
    }
}

impl TokenCodecPort for HmacTokenCodec {
    fn issue(&self, user: &User) -> String {
        let claims = TokenClaims {
            user_id: user.id.clone(),
            user_name: user.username.clone(),
            name: user.name.clone(),
            is_admin: user.is_system_admin,
            exp: (Utc::now() + Duration::seconds(self.ttl_secs)).timestamp(),
        };

        // 纯 String/bool/i64 字段,序列化不可能失败
        let payload =
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).expect("token claims serialize"));
        let tag = hmac::sign(&self.key, payload.as_bytes());
        format!("{}.{}", payload, URL_SAFE_NO_PAD.encode(tag.as_ref()))
    }

    fn decode(&self, bearer: &str) -> Option<AccessIdentity> {
        let token = bearer.strip_prefix("Bearer ")?.trim();
        if token.is_empty() || token == "null" {
            return None;
        }

        let (payload, signature) = token.split_once('.')?;
        let tag = URL_SAFE_NO_PAD.decode(signature).ok()?;
        hmac::verify(&self.key, payload.as_bytes(), &tag).ok()?;

        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: TokenClaims = serde_json::from_slice(&bytes).ok()?;

        if claims.exp < Utc::now().timestamp() {
            return None;
        }

        Some(AccessIdentity {
            user_id: claims.user_id,
            user_name: claims.user_name,
            name: claims.name,
            is_admin: claims.is_admin,
        })
    }
}
