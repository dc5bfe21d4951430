//! 外部身份服务签发的 HS256 令牌
//!
//! 本服务只校验令牌，不负责签发；`sign` 供测试与运维脚本使用。

use crate::config::AppConfig;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // 用户 ID
    pub exp: usize,  // 过期时间
    pub iat: usize,  // 签发时间
    #[serde(default)]
    pub iss: String, // 签发方
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 使用配置中的密钥与签发方验证
    pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let jwt = &AppConfig::get().jwt;
        Self::verify_with(token, &jwt.secret, &jwt.issuer, jwt.leeway)
    }

    pub fn verify_with(
        token: &str,
        secret: &str,
        issuer: &str,
        leeway: u64,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway;
        // 未配置签发方时不校验 iss
        if !issuer.is_empty() {
            validation.set_issuer(&[issuer]);
        }

        decode::<Claims>(token, &decoding_key, &validation).map(|token_data| token_data.claims)
    }

    pub fn sign(
        user_id: i64,
        secret: &str,
        issuer: &str,
        expiry: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + expiry).timestamp() as usize,
            iat: now.timestamp() as usize,
            iss: issuer.to_string(),
        };
        let encoding_key = EncodingKey::from_secret(secret.as_ref());

        encode(&Header::new(Algorithm::HS256), &claims, &encoding_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";
    const ISSUER: &str = "lms-identity";

    #[test]
    fn test_sign_then_verify() {
        let token = JwtUtils::sign(42, SECRET, ISSUER, chrono::Duration::minutes(5)).unwrap();
        let claims = JwtUtils::verify_with(&token, SECRET, ISSUER, 0).unwrap();
        assert_eq!(claims.user_id(), Some(42));
    }

    #[test]
    fn test_rejects_wrong_secret_issuer_and_expired() {
        let token = JwtUtils::sign(42, SECRET, ISSUER, chrono::Duration::minutes(5)).unwrap();
        assert!(JwtUtils::verify_with(&token, "other-secret", ISSUER, 0).is_err());
        assert!(JwtUtils::verify_with(&token, SECRET, "someone-else", 0).is_err());

        let expired = JwtUtils::sign(42, SECRET, ISSUER, chrono::Duration::minutes(-10)).unwrap();
        assert!(JwtUtils::verify_with(&expired, SECRET, ISSUER, 0).is_err());
    }
}
